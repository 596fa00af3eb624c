// ============================================================================
// domain/error.rs - COMPREHENSIVE ERROR DOMAIN
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Dependency Errors
    // ========================================================================
    #[error("'{name}' cannot be both a peer and a bundled dependency")]
    DependencyConflict { name: String },

    #[error("cannot resolve a minimum version for '{name}' from range '{range}': {reason}")]
    UnresolvableRange {
        name: String,
        range: String,
        reason: String,
    },

    // ========================================================================
    // Task Errors
    // ========================================================================
    #[error("a task named '{name}' already exists")]
    DuplicateTask { name: String },

    #[error("task spawn cycle detected: {chain}")]
    TaskCycle { chain: String },

    #[error("no task named '{name}' is defined")]
    UnknownTask { name: String },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("unknown run mode '{mode}' (expected 'indirect' or 'direct')")]
    InvalidRunMode { mode: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::DependencyConflict { name } => vec![
                format!("'{}' is declared under mutually exclusive roles", name),
                "Bundled dependencies are shipped with the package; peer dependencies are provided by the consumer".into(),
                "Remove one of the two declarations".into(),
            ],
            Self::UnresolvableRange { name, range, .. } => vec![
                format!("Peer dependency '{}' declares the range '{}'", name, range),
                "Peer pinning needs a range with a computable minimum, e.g. ^2.0.0 or >=1.4".into(),
            ],
            Self::DuplicateTask { name } => vec![
                format!("A task named '{}' was already defined", name),
                "Task names must be unique within a project".into(),
            ],
            Self::TaskCycle { chain } => vec![
                format!("Spawn chain: {}", chain),
                "Remove one of the spawn references to break the cycle".into(),
            ],
            Self::UnknownTask { name } => vec![
                format!("No task named '{}'", name),
                "Try: projforge tasks".into(),
            ],
            Self::InvalidRunMode { .. } => vec![
                "Supported run modes are 'indirect' and 'direct'".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DependencyConflict { .. } => ErrorCategory::Conflict,
            Self::UnresolvableRange { .. } | Self::DuplicateTask { .. } => {
                ErrorCategory::Validation
            }
            Self::TaskCycle { .. } => ErrorCategory::Validation,
            Self::UnknownTask { .. } => ErrorCategory::NotFound,
            Self::InvalidRunMode { .. } | Self::InvalidConfiguration(_) => {
                ErrorCategory::Configuration
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Configuration,
    Internal,
}
