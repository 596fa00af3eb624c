//! Infrastructure adapters for Projforge.
//!
//! Implements the driven ports defined in `projforge_core` and ships the
//! built-in artifact components.

pub mod components;
pub mod emitter;
pub mod registry;
pub mod runner;

pub use components::{
    CiWorkflow, IgnoreFile, LicenseFile, ManifestFile, PackageInstall, RUNBOOK_PATH,
    RunbookFile, ScriptRegistrar, TasksManifest,
};
pub use emitter::{LocalEmitter, MemoryEmitter};
pub use registry::{NodeModulesRegistry, StaticRegistry};
pub use runner::{RecordingRunner, ShellRunner};
