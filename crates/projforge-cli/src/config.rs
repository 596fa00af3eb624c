//! Project definition loading.
//!
//! [`ProjectDefinition`] is the declarative `.projforge.toml` the user
//! writes. The CLI layer owns config; the core crate never sees TOML:
//! `build_project` translates the definition into a configured
//! [`Project`] with its component set.
//!
//! # Example definition
//!
//! ```toml
//! name = "demo"
//! version = "1.0.0"
//!
//! [dependencies]
//! runtime = ["left-pad"]
//! dev = ["test-lib@^3"]
//! peer = ["react@^16"]
//!
//! [options]
//! peer_pinning = true
//!
//! [tasks.build]
//! category = "build"
//! steps = [{ exec = "tsc" }]
//!
//! [tasks.test]
//! category = "test"
//! steps = [{ spawn = "build" }, { exec = "jest" }]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use projforge_adapters::{
    CiWorkflow, IgnoreFile, LicenseFile, ManifestFile, PackageInstall, ScriptRegistrar,
    TasksManifest,
};
use projforge_core::{
    application::{Project, SynthOptions},
    domain::{TaskCategory, TaskStep},
};

use crate::error::{CliError, CliResult};

/// Default project definition file name.
pub const DEFINITION_FILE: &str = ".projforge.toml";

/// The declarative project definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDefinition {
    /// Package name.
    pub name: String,
    /// Output directory, relative to the definition file's directory.
    #[serde(default = "default_outdir")]
    pub outdir: PathBuf,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub license: Option<LicenseSection>,
    #[serde(default)]
    pub dependencies: DependencySection,
    #[serde(default)]
    pub options: OptionsSection,
    #[serde(default)]
    pub artifacts: ArtifactsSection,
    #[serde(default)]
    pub tasks: BTreeMap<String, TaskSection>,
}

fn default_outdir() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseSection {
    /// SPDX identifier (MIT, Apache-2.0).
    pub spdx: String,
    pub year: String,
    pub owner: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencySection {
    #[serde(default)]
    pub runtime: Vec<String>,
    #[serde(default)]
    pub dev: Vec<String>,
    #[serde(default)]
    pub peer: Vec<String>,
    #[serde(default)]
    pub bundled: Vec<String>,
    #[serde(default)]
    pub test: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsSection {
    #[serde(default)]
    pub peer_pinning: bool,
    #[serde(default = "default_true")]
    pub anti_tamper: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OptionsSection {
    fn default() -> Self {
        Self {
            peer_pinning: false,
            anti_tamper: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsSection {
    /// Patterns for the generated `.gitignore`; empty disables the file.
    #[serde(default = "default_gitignore")]
    pub gitignore: Vec<String>,
    /// Name of the CI workflow; `None` disables it.
    #[serde(default)]
    pub workflow: Option<String>,
    /// Task names the workflow runs as steps.
    #[serde(default)]
    pub workflow_tasks: Vec<String>,
    /// Run the package manager after synthesis.
    #[serde(default)]
    pub install: bool,
}

fn default_gitignore() -> Vec<String> {
    vec!["node_modules/".to_string()]
}

impl Default for ArtifactsSection {
    fn default() -> Self {
        Self {
            gitignore: default_gitignore(),
            workflow: None,
            workflow_tasks: Vec::new(),
            install: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskSection {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<TaskStep>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl ProjectDefinition {
    /// Load the definition from `--config` or the default location.
    pub fn load(config_file: Option<&PathBuf>) -> CliResult<Self> {
        let path = config_file
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFINITION_FILE));
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CliError::ProjectDefinitionMissing { path });
            }
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&text).map_err(|e| CliError::ConfigError {
            message: format!("{}: {e}", path.display()),
            source: Some(Box::new(e)),
        })
    }

    /// Resolve the output directory relative to a base directory.
    pub fn resolved_outdir(&self, base: &Path) -> PathBuf {
        if self.outdir.is_absolute() {
            self.outdir.clone()
        } else {
            base.join(&self.outdir)
        }
    }

    /// Synthesis options derived from the definition plus CLI flags.
    pub fn synth_options(&self, frozen: bool) -> SynthOptions {
        SynthOptions {
            peer_pinning: self.options.peer_pinning,
            anti_tamper: self.options.anti_tamper,
            frozen,
            ..SynthOptions::default()
        }
    }

    /// Build the component tree this definition describes.
    pub fn build_project(&self, base: &Path) -> CliResult<Project> {
        let mut project = Project::new(&self.name, self.resolved_outdir(base));

        let runtime: Vec<&str> = self.dependencies.runtime.iter().map(String::as_str).collect();
        project.add_deps(&runtime);
        let dev: Vec<&str> = self.dependencies.dev.iter().map(String::as_str).collect();
        project.add_dev_deps(&dev);
        let peer: Vec<&str> = self.dependencies.peer.iter().map(String::as_str).collect();
        project.add_peer_deps(&peer);
        let bundled: Vec<&str> = self.dependencies.bundled.iter().map(String::as_str).collect();
        project.add_bundled_deps(&bundled);
        let test: Vec<&str> = self.dependencies.test.iter().map(String::as_str).collect();
        project.add_test_deps(&test);

        for (name, section) in &self.tasks {
            let category = match &section.category {
                Some(text) => text.parse::<TaskCategory>().map_err(|e| CliError::Core(e.into()))?,
                None => TaskCategory::default(),
            };
            let task = project
                .tasks_mut()
                .define(name.clone(), category, section.description.as_deref())
                .map_err(|e| CliError::Core(e.into()))?;
            for step in &section.steps {
                match step {
                    TaskStep::Exec(command) => task.exec(command.clone()),
                    TaskStep::Spawn(other) => task.spawn(other.clone()),
                };
            }
            for (key, value) in &section.env {
                task.env(key.clone(), value.clone());
            }
        }

        // Component order matters: the registrar publishes scripts in the
        // pre phase, the manifest embeds them in the synth phase.
        project.add_component(ScriptRegistrar::new());

        let mut manifest = ManifestFile::new(&self.name);
        if let Some(version) = &self.version {
            manifest = manifest.version(version);
        }
        if let Some(description) = &self.description {
            manifest = manifest.description(description);
        }
        if let Some(license) = &self.license {
            manifest = manifest.license(&license.spdx);
        }
        project.add_component(manifest);

        project.add_component(TasksManifest);

        if !self.artifacts.gitignore.is_empty() {
            project.add_component(
                IgnoreFile::new().patterns(self.artifacts.gitignore.iter().cloned()),
            );
        }
        if let Some(license) = &self.license {
            project.add_component(LicenseFile::new(&license.spdx, &license.year, &license.owner));
        }
        if let Some(workflow_name) = &self.artifacts.workflow {
            let mut workflow = CiWorkflow::new(workflow_name);
            for task_name in &self.artifacts.workflow_tasks {
                workflow = workflow.run_task(task_name);
            }
            project.add_component(workflow);
        }
        if self.artifacts.install {
            project.add_component(PackageInstall::new());
        }

        Ok(project)
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const DEFINITION: &str = r#"
name = "demo"
version = "1.0.0"

[dependencies]
runtime = ["left-pad"]
peer = ["react@^16"]

[options]
peer_pinning = true

[license]
spdx = "MIT"
year = "2025"
owner = "Demo Authors"

[artifacts]
workflow = "build"
workflow_tasks = ["test"]

[tasks.build]
category = "build"
description = "Compile sources"
steps = [{ exec = "tsc" }]

[tasks.test]
category = "test"
steps = [{ spawn = "build" }, { exec = "jest" }]
env = { NODE_ENV = "test" }
"#;

    #[test]
    fn definition_parses_and_builds_a_project() {
        let definition: ProjectDefinition = toml::from_str(DEFINITION).unwrap();
        let project = definition.build_project(Path::new("/work")).unwrap();

        assert_eq!(project.name(), "demo");
        assert_eq!(project.outdir(), Path::new("/work/."));
        assert_eq!(project.deps().all().len(), 2);
        assert!(project.tasks().get("build").is_some());
        assert!(project.tasks().get("test").is_some());
    }

    #[test]
    fn spawn_steps_survive_the_toml_round_trip() {
        let definition: ProjectDefinition = toml::from_str(DEFINITION).unwrap();
        let steps = &definition.tasks["test"].steps;
        assert_eq!(steps[0], TaskStep::Spawn("build".into()));
        assert_eq!(steps[1], TaskStep::Exec("jest".into()));
    }

    #[test]
    fn options_default_to_tamper_check_on() {
        let definition: ProjectDefinition = toml::from_str("name = \"x\"").unwrap();
        let options = definition.synth_options(false);
        assert!(options.anti_tamper);
        assert!(!options.peer_pinning);
        assert!(!options.frozen);
    }

    #[test]
    fn unknown_task_category_is_a_core_error() {
        let text = r#"
name = "x"
[tasks.weird]
category = "quantum"
"#;
        let definition: ProjectDefinition = toml::from_str(text).unwrap();
        assert!(definition.build_project(Path::new("/w")).is_err());
    }

    #[test]
    fn missing_definition_file_maps_to_not_found() {
        let err =
            ProjectDefinition::load(Some(&PathBuf::from("/definitely/absent.toml"))).unwrap_err();
        assert!(matches!(err, CliError::ProjectDefinitionMissing { .. }));
    }
}
