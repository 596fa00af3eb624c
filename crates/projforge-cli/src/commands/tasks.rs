//! Implementation of the `projforge tasks` command.

use std::path::{Path, PathBuf};

use projforge_adapters::RunbookFile;

use crate::{
    cli::{GlobalArgs, TasksArgs, TasksFormat},
    commands::run::load_runbook,
    config::ProjectDefinition,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: TasksArgs, global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    let outdir = match ProjectDefinition::load(global.config.as_ref()) {
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
    };
    let graph = load_runbook(&outdir)?;

    match args.format {
        TasksFormat::Table => {
            output.header("Defined tasks:")?;
            for task in graph.iter() {
                let description = task.description.as_deref().unwrap_or("");
                output.print(&format!(
                    "  {:<16} {:<12} {}",
                    task.name, task.category, description
                ))?;
            }
        }
        TasksFormat::List => {
            for task in graph.iter() {
                println!("{}", task.name);
            }
        }
        TasksFormat::Json => {
            // Serialise to stdout directly (bypasses OutputManager because
            // JSON output must be parseable even in non-TTY pipes).
            let runbook = RunbookFile::from_graph(&graph);
            let json =
                serde_json::to_string_pretty(&runbook).unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }

    Ok(())
}
