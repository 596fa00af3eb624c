//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names,
//! aliases, help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "projforge",
    bin_name = "projforge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Declarative project synthesis",
    long_about = "Projforge synthesizes project artifacts (manifest, tasks, \
                  ignore files, licenses, CI workflows) from one declarative \
                  definition.",
    after_help = "EXAMPLES:\n\
        \x20 projforge synth\n\
        \x20 projforge synth --frozen          # CI: fail on drifted output\n\
        \x20 projforge run test\n\
        \x20 projforge run build --direct      # print the flattened command\n\
        \x20 projforge tasks --format json",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Synthesize the project from its definition.
    #[command(
        visible_alias = "s",
        about = "Synthesize project artifacts",
        after_help = "EXAMPLES:\n\
            \x20 projforge synth\n\
            \x20 projforge synth --dry-run\n\
            \x20 projforge synth --frozen"
    )]
    Synth(SynthArgs),

    /// Run a synthesized task.
    #[command(
        visible_alias = "r",
        about = "Run a task from the runbook",
        after_help = "EXAMPLES:\n\
            \x20 projforge run build\n\
            \x20 projforge run test --direct"
    )]
    Run(RunArgs),

    /// List defined tasks.
    #[command(
        visible_alias = "ls",
        about = "List tasks from the runbook",
        after_help = "EXAMPLES:\n\
            \x20 projforge tasks\n\
            \x20 projforge tasks --format json"
    )]
    Tasks(TasksArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 projforge completions bash > ~/.local/share/bash-completion/completions/projforge\n\
            \x20 projforge completions zsh  > ~/.zfunc/_projforge\n\
            \x20 projforge completions fish > ~/.config/fish/completions/projforge.fish"
    )]
    Completions(CompletionsArgs),
}

// ── synth ─────────────────────────────────────────────────────────────────────

/// Arguments for `projforge synth`.
#[derive(Debug, Args)]
pub struct SynthArgs {
    /// Preview what would be written without touching the filesystem.
    #[arg(long = "dry-run", help = "Show what would be written without writing")]
    pub dry_run: bool,

    /// Frozen/CI execution: strict installs, fail on drifted output.
    #[arg(
        long = "frozen",
        env = "PROJFORGE_FROZEN",
        help = "Fail if generated files would change (CI mode)"
    )]
    pub frozen: bool,
}

// ── run ───────────────────────────────────────────────────────────────────────

/// Arguments for `projforge run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Name of the task to run.
    #[arg(value_name = "TASK", help = "Task name from the runbook")]
    pub task: String,

    /// Print the flattened command line instead of executing it.
    #[arg(long = "direct", help = "Print the flattened command line, don't execute")]
    pub direct: bool,
}

// ── tasks ─────────────────────────────────────────────────────────────────────

/// Arguments for `projforge tasks`.
#[derive(Debug, Args)]
pub struct TasksArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: TasksFormat,
}

/// Output format for the `tasks` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TasksFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `projforge completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_synth_command() {
        let cli = Cli::parse_from(["projforge", "synth", "--frozen"]);
        if let Commands::Synth(args) = cli.command {
            assert!(args.frozen);
            assert!(!args.dry_run);
        } else {
            panic!("expected Synth command");
        }
    }

    #[test]
    fn parse_run_command_with_direct() {
        let cli = Cli::parse_from(["projforge", "run", "build", "--direct"]);
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.task, "build");
            assert!(args.direct);
        } else {
            panic!("expected Run command");
        }
    }

    #[test]
    fn run_alias_is_r() {
        let cli = Cli::parse_from(["projforge", "r", "test"]);
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        // clap should reject --quiet --verbose together
        let result = Cli::try_parse_from(["projforge", "--quiet", "--verbose", "tasks"]);
        assert!(result.is_err());
    }
}
