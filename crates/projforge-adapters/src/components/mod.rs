//! Built-in artifact components.
//!
//! Each component implements the three-phase hook contract from
//! `projforge_core`. The catalogue covers the artifacts every synthesized
//! project carries: the package manifest, the script registrar that feeds
//! it, the machine-readable task runbook, ignore and license files, a CI
//! workflow, and the post-synthesis package installer.

pub mod ignore;
pub mod install;
pub mod license;
pub mod manifest;
pub mod runbook;
pub mod scripts;
pub mod workflow;

pub use ignore::IgnoreFile;
pub use install::PackageInstall;
pub use license::LicenseFile;
pub use manifest::ManifestFile;
pub use runbook::{RUNBOOK_PATH, RunbookFile, TasksManifest};
pub use scripts::ScriptRegistrar;
pub use workflow::CiWorkflow;

/// Comment header stamped on generated text artifacts.
///
/// Deliberately absent from `package.json` (JSON has no comments) and the
/// license file (its content is legal text, not tooling output).
pub const GENERATED_HEADER: &str =
    "~~ Generated by projforge. Edit the project definition and re-run 'projforge synth'.";
