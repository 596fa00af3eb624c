//! Installed-package registry lookups.
//!
//! Resolution against installed state is best-effort by contract: every
//! failure path here is `None`, never an error. The synthesis core warns
//! and moves on.

use std::collections::HashMap;
use std::path::Path;

use projforge_core::application::ports::PackageRegistry;
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize)]
struct InstalledManifest {
    version: String,
}

/// Resolves installed versions from `node_modules/<name>/package.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeModulesRegistry;

impl NodeModulesRegistry {
    pub fn new() -> Self {
        Self
    }
}

impl PackageRegistry for NodeModulesRegistry {
    fn resolve(&self, outdir: &Path, name: &str) -> Option<String> {
        let manifest = outdir.join("node_modules").join(name).join("package.json");
        let text = std::fs::read_to_string(&manifest).ok()?;
        match serde_json::from_str::<InstalledManifest>(&text) {
            Ok(parsed) => Some(parsed.version),
            Err(e) => {
                debug!(package = name, error = %e, "installed manifest unparsable");
                None
            }
        }
    }
}

/// Fixed name→version map for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    versions: HashMap<String, String>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.versions.insert(name.into(), version.into());
        self
    }
}

impl PackageRegistry for StaticRegistry {
    fn resolve(&self, _outdir: &Path, name: &str) -> Option<String> {
        self.versions.get(name).cloned()
    }
}
