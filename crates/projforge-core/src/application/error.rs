//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ErrorCategory;

/// Errors that occur during synthesis orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Emission boundary failure (write, read, or mkdir).
    #[error("Emitter error at {path}: {reason}")]
    EmitFailed { path: PathBuf, reason: String },

    /// Shared emitter state poisoned (in-memory emitter lock).
    #[error("Emitter state lock poisoned")]
    EmitterLockPoisoned,

    /// A previously generated manifest exists but cannot be parsed.
    #[error("Cannot parse prior manifest at {path}: {reason}")]
    ManifestParse { path: PathBuf, reason: String },

    /// Frozen run detected drift in tracked generated files.
    #[error("Generated files changed in a frozen run: {}", paths_display(.paths))]
    TamperDetected { paths: Vec<PathBuf> },

    /// External install command failed.
    #[error("Install command '{command}' failed: {reason}")]
    InstallFailed { command: String, reason: String },

    /// A hook ran without a collaborator it depends on.
    #[error("Required collaborator missing: {name}")]
    MissingCollaborator { name: &'static str },
}

fn paths_display(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::EmitFailed { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the output directory exists".into(),
            ],
            Self::ManifestParse { path, .. } => vec![
                format!("The existing manifest at {} is not valid JSON", path.display()),
                "Fix or delete the file and re-run synthesis".into(),
            ],
            Self::TamperDetected { .. } => vec![
                "Generated files are out of date with their source of truth".into(),
                "Run 'projforge synth' locally and commit the result".into(),
            ],
            Self::InstallFailed { .. } => vec![
                "The package manager install step failed".into(),
                "Re-run with -v to see the command output".into(),
            ],
            Self::MissingCollaborator { name } => vec![
                format!("Required component not configured: {}", name),
                "This is likely a configuration error".into(),
            ],
            Self::EmitterLockPoisoned => vec!["Try again in a moment".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmitFailed { .. } | Self::EmitterLockPoisoned => ErrorCategory::Internal,
            Self::ManifestParse { .. } => ErrorCategory::Validation,
            Self::TamperDetected { .. } => ErrorCategory::Validation,
            Self::InstallFailed { .. } => ErrorCategory::Internal,
            Self::MissingCollaborator { .. } => ErrorCategory::Configuration,
        }
    }
}
