//! Implementation of the `projforge run` command.
//!
//! This is the indirect-mode re-entry path: manifest scripts say
//! `projforge run <task>`, and this handler looks the task up in the
//! synthesized runbook, flattens it, and executes the steps through the
//! shell runner.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use projforge_adapters::{RUNBOOK_PATH, RunbookFile, ShellRunner};
use projforge_core::{application::ports::CommandRunner, domain::TaskGraph};

use crate::{
    cli::{GlobalArgs, RunArgs},
    config::ProjectDefinition,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(task = %args.task))]
pub fn execute(args: RunArgs, global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    let outdir = resolve_outdir(&global);
    let graph = load_runbook(&outdir)?;

    if graph.get(&args.task).is_none() {
        return Err(CliError::TaskNotFound { name: args.task });
    }

    let commands = graph.flatten(&args.task).map_err(|e| {
        CliError::Core(e.into())
    })?;
    let env = graph
        .resolved_env(&args.task)
        .map_err(|e| CliError::Core(e.into()))?;

    if args.direct {
        // Print the joined command line instead of executing; useful for
        // embedding in scripts and debugging flattening.
        output.print(&commands.join("; "))?;
        return Ok(());
    }

    let runner = ShellRunner::new();
    for command in &commands {
        info!(%command, "step");
        output.print(&format!("  $ {command}"))?;
        runner
            .run(command, &outdir, &env)
            .map_err(CliError::Core)?;
    }
    output.success(&format!("Task '{}' completed", args.task))?;
    Ok(())
}

/// The runbook lives under the project outdir; fall back to the current
/// directory when no definition is available (e.g. running inside a
/// generated project).
fn resolve_outdir(global: &GlobalArgs) -> PathBuf {
    match ProjectDefinition::load(global.config.as_ref()) {
        Ok(definition) => {
            let base = global
                .config
                .as_deref()
                .and_then(Path::parent)
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            definition.resolved_outdir(base)
        }
        Err(_) => PathBuf::from("."),
    }
}

pub(crate) fn load_runbook(outdir: &Path) -> CliResult<TaskGraph> {
    let path = outdir.join(RUNBOOK_PATH);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CliError::RunbookMissing { path });
        }
        Err(e) => return Err(e.into()),
    };
    let runbook: RunbookFile = serde_json::from_str(&text).map_err(|e| CliError::ConfigError {
        message: format!("{}: {e}", path.display()),
        source: Some(Box::new(e)),
    })?;
    runbook.into_graph().map_err(|e| CliError::Core(e.into()))
}
