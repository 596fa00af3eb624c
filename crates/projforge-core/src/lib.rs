//! Projforge Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the
//! Projforge project-synthesis tool, following hexagonal (ports and
//! adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         projforge-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │            (Synthesizer)                │
//! │     Drives the three-phase walk         │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │   (Emitter, PackageRegistry, Runner)    │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    projforge-adapters (Infrastructure)  │
//! │  (LocalEmitter, MemoryEmitter, etc)     │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Domain Layer (Pure Logic)         │
//! │  (DependencyLedger, TaskGraph, ...)     │
//! │        No External Dependencies         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use projforge_core::{
//!     application::{Project, SynthOptions, Synthesizer},
//!     domain::TaskCategory,
//! };
//!
//! // 1. Describe the project
//! let mut project = Project::new("my-lib", "./my-lib");
//! project.add_deps(&["left-pad"]);
//! project.add_peer_deps(&["react@^16"]);
//! project
//!     .tasks_mut()
//!     .define("build", TaskCategory::Build, Some("Compile sources"))
//!     .unwrap()
//!     .exec("tsc");
//!
//! // 2. Synthesize (with injected adapters)
//! let mut synthesizer = Synthesizer::new(emitter, registry, runner, SynthOptions::default());
//! let report = synthesizer.synth(&mut project).unwrap();
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        Component, Project, SynthContext, SynthOptions, SynthReport, Synthesizer,
        ports::{CommandRunner, Emitter, PackageRegistry},
    };
    pub use crate::domain::{
        Dependency, DependencyKind, DependencyLedger, DependencySnapshot, FieldBag, RunMode,
        Task, TaskCategory, TaskGraph, TaskStep, VersionSpec,
    };
    pub use crate::error::{ForgeError, ForgeResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
