//! The package manifest component.

use serde_json::{Map, Value, json};

use projforge_core::{
    application::{ApplicationError, Component, SynthContext},
    domain::FieldBag,
    error::ForgeResult,
};

/// File name of the emitted manifest.
pub const MANIFEST_PATH: &str = "package.json";

/// Renders the resolved dependency snapshot, registered scripts, and the
/// free-form field bag into `package.json`.
///
/// Reads only finalized state: the snapshot the orchestrator computes at
/// the end of the pre phase, and the scripts the registrar publishes
/// during it. Key order is fixed (metadata, scripts, dependency maps,
/// then bag fields in insertion order) so output is byte-stable.
pub struct ManifestFile {
    package_name: String,
    version: String,
    description: Option<String>,
    license: Option<String>,
    fields: FieldBag,
}

impl ManifestFile {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            version: "0.0.0".to_string(),
            description: None,
            license: None,
            fields: FieldBag::new(),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn license(mut self, spdx: impl Into<String>) -> Self {
        self.license = Some(spdx.into());
        self
    }

    /// Inject an arbitrary manifest field. Later writes win per key.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.set(key, value);
        self
    }
}

impl Component for ManifestFile {
    fn name(&self) -> &str {
        "manifest-file"
    }

    fn synthesize(&mut self, ctx: &mut SynthContext<'_>) -> ForgeResult<()> {
        let snapshot = ctx
            .snapshot()
            .cloned()
            .ok_or(ApplicationError::MissingCollaborator {
                name: "dependency snapshot",
            })?;

        let mut doc = Map::new();
        doc.insert("name".into(), json!(self.package_name));
        doc.insert("version".into(), json!(self.version));
        if let Some(description) = &self.description {
            doc.insert("description".into(), json!(description));
        }
        if let Some(license) = &self.license {
            doc.insert("license".into(), json!(license));
        }

        if !ctx.scripts().is_empty() {
            let scripts: Map<String, Value> = ctx
                .scripts()
                .iter()
                .map(|(name, command)| (name.clone(), json!(command)))
                .collect();
            doc.insert("scripts".into(), Value::Object(scripts));
        }

        if let Value::Object(deps) = serde_json::to_value(&snapshot).map_err(|e| {
            ApplicationError::EmitFailed {
                path: MANIFEST_PATH.into(),
                reason: e.to_string(),
            }
        })? {
            for (key, value) in deps {
                doc.insert(key, value);
            }
        }

        for (key, value) in self.fields.iter() {
            doc.insert(key.to_string(), value.clone());
        }

        let text = format!(
            "{}\n",
            serde_json::to_string_pretty(&Value::Object(doc)).map_err(|e| {
                ApplicationError::EmitFailed {
                    path: MANIFEST_PATH.into(),
                    reason: e.to_string(),
                }
            })?
        );
        ctx.write_file(MANIFEST_PATH, &text)
    }
}
