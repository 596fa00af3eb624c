//! Post-synthesis package installation and wildcard resolution.

use serde_json::Value;
use tracing::debug;

use projforge_core::{
    application::{ApplicationError, Component, SynthContext},
    error::ForgeResult,
};

use super::manifest::MANIFEST_PATH;

/// Runs the package manager after files are emitted, then pins wildcard
/// requirements to whatever actually got installed.
///
/// This is the only place installed state is consulted, and it happens in
/// the post phase by construction: the manifest must exist on disk before
/// an install can populate `node_modules`.
pub struct PackageInstall {
    install_command: String,
    frozen_command: String,
}

impl PackageInstall {
    pub fn new() -> Self {
        Self {
            install_command: "npm install".to_string(),
            frozen_command: "npm ci".to_string(),
        }
    }

    /// Override the install command pair (e.g. for yarn or pnpm).
    pub fn with_commands(
        install_command: impl Into<String>,
        frozen_command: impl Into<String>,
    ) -> Self {
        Self {
            install_command: install_command.into(),
            frozen_command: frozen_command.into(),
        }
    }
}

impl Default for PackageInstall {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for PackageInstall {
    fn name(&self) -> &str {
        "package-install"
    }

    fn post_synthesize(&mut self, ctx: &mut SynthContext<'_>) -> ForgeResult<()> {
        let command = if ctx.options().frozen {
            &self.frozen_command
        } else {
            &self.install_command
        };
        let env = ctx.task_graph().environment().clone();
        ctx.runner().run(command, ctx.outdir(), &env)?;

        let Some(mut snapshot) = ctx.snapshot().cloned() else {
            return Err(ApplicationError::MissingCollaborator {
                name: "dependency snapshot",
            }
            .into());
        };

        let outdir = ctx.outdir().to_path_buf();
        let unresolved = {
            let registry = ctx.registry();
            snapshot.resolve_installed(|name| registry.resolve(&outdir, name))
        };
        for name in unresolved {
            ctx.warn(format!(
                "could not determine the installed version of '{name}'; leaving it unpinned"
            ));
        }

        if Some(&snapshot) != ctx.snapshot() {
            debug!("installed versions changed the snapshot; rewriting manifest");
            if let Some(text) = ctx.read_file(MANIFEST_PATH)? {
                let mut doc: Value =
                    serde_json::from_str(&text).map_err(|e| ApplicationError::ManifestParse {
                        path: MANIFEST_PATH.into(),
                        reason: e.to_string(),
                    })?;
                if let (Value::Object(doc), Value::Object(deps)) = (
                    &mut doc,
                    serde_json::to_value(&snapshot).map_err(|e| {
                        ApplicationError::EmitFailed {
                            path: MANIFEST_PATH.into(),
                            reason: e.to_string(),
                        }
                    })?,
                ) {
                    for (key, value) in deps {
                        doc.insert(key, value);
                    }
                }
                let text = format!(
                    "{}\n",
                    serde_json::to_string_pretty(&doc).map_err(|e| {
                        ApplicationError::EmitFailed {
                            path: MANIFEST_PATH.into(),
                            reason: e.to_string(),
                        }
                    })?
                );
                ctx.write_file(MANIFEST_PATH, &text)?;
            }
            if let Some(current) = ctx.snapshot_mut() {
                *current = snapshot;
            }
        }

        Ok(())
    }
}
