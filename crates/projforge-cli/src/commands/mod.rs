//! Command handlers. One module per subcommand.

pub mod completions;
pub mod run;
pub mod synth;
pub mod tasks;
