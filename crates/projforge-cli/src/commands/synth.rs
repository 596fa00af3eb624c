//! Implementation of the `projforge synth` command.

use std::path::Path;

use tracing::instrument;

use projforge_adapters::{
    LocalEmitter, MemoryEmitter, NodeModulesRegistry, RecordingRunner, ShellRunner,
};
use projforge_core::application::Synthesizer;

use crate::{
    cli::{GlobalArgs, SynthArgs},
    config::ProjectDefinition,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(dry_run = args.dry_run, frozen = args.frozen))]
pub fn execute(args: SynthArgs, global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    let definition = ProjectDefinition::load(global.config.as_ref())?;
    let base = global
        .config
        .as_deref()
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut project = definition.build_project(base)?;
    let options = definition.synth_options(args.frozen);

    let report = if args.dry_run {
        // Dry runs synthesize into memory; with nothing pre-existing every
        // artifact shows up as a would-be write.
        let mut synthesizer = Synthesizer::new(
            Box::new(MemoryEmitter::new()),
            Box::new(NodeModulesRegistry::new()),
            Box::new(RecordingRunner::new()),
            options,
        );
        synthesizer.synth(&mut project)?
    } else {
        let mut synthesizer = Synthesizer::new(
            Box::new(LocalEmitter::new()),
            Box::new(NodeModulesRegistry::new()),
            Box::new(ShellRunner::new()),
            options,
        );
        synthesizer.synth(&mut project)?
    };

    let verb = if args.dry_run { "would write" } else { "wrote" };
    for file in report.written() {
        output.print(&format!("  {} {}", verb, file.path.display()))?;
    }
    for warning in &report.warnings {
        output.warning(warning)?;
    }
    output.success(&format!(
        "Synthesized '{}': {} written, {} unchanged",
        project.name(),
        report.written().count(),
        report.unchanged().count()
    ))?;
    Ok(())
}
