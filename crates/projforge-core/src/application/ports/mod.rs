//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the synthesis core needs from external
//! systems. The `projforge-adapters` crate provides implementations.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ForgeResult;

/// Port for the emission boundary: "write this file".
///
/// Implemented by:
/// - `projforge_adapters::emitter::LocalEmitter` (production)
/// - `projforge_adapters::emitter::MemoryEmitter` (testing, dry-run)
///
/// ## Design Notes
///
/// - `read_file` exists because idempotent writes and prior-manifest
///   reconciliation both need to observe what is already on disk.
/// - Absence of a file is `Ok(None)`, not an error.
#[cfg_attr(test, mockall::automock)]
pub trait Emitter: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ForgeResult<()>;

    /// Write content to a file.
    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()>;

    /// Read a file's content, `None` if it does not exist.
    fn read_file(&self, path: &Path) -> ForgeResult<Option<String>>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for installed-package metadata lookup.
///
/// Implemented by:
/// - `projforge_adapters::registry::NodeModulesRegistry` (production)
/// - `projforge_adapters::registry::StaticRegistry` (testing)
///
/// Lookup failure is `None`: resolution against installed state is
/// best-effort and never fatal.
#[cfg_attr(test, mockall::automock)]
pub trait PackageRegistry: Send + Sync {
    /// The installed version of `name` under `outdir`, if discoverable.
    fn resolve(&self, outdir: &Path, name: &str) -> Option<String>;
}

/// Port for running an external command synchronously.
///
/// Implemented by:
/// - `projforge_adapters::runner::ShellRunner` (production)
/// - `projforge_adapters::runner::RecordingRunner` (testing)
pub trait CommandRunner: Send + Sync {
    /// Run `command` in `cwd` with `env` overlaid on the process
    /// environment; returns once the command has completed.
    fn run(
        &self,
        command: &str,
        cwd: &Path,
        env: &BTreeMap<String, String>,
    ) -> ForgeResult<()>;
}
