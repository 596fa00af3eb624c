//! Application layer for Projforge.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (the `Synthesizer`)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Project/Component**: the composition tree and its hook contract
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod context;
pub mod error;
pub mod ports;
pub mod project;
pub mod services;

// Re-export the synthesis surface
pub use context::{EmittedFile, FileOutcome, SynthContext, SynthOptions, SynthReport};
pub use project::{Component, Project, SynthState};
pub use services::{SynthPhase, Synthesizer};

// Re-export port traits (for adapter implementation)
pub use ports::{CommandRunner, Emitter, PackageRegistry};

pub use error::ApplicationError;
