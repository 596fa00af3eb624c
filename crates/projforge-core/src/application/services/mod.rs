//! Application services - use case orchestration.

pub mod synthesizer;

pub use synthesizer::{SynthPhase, Synthesizer};
