//! The package-script registrar.

use projforge_core::{
    application::{Component, SynthContext},
    domain::RunMode,
    error::ForgeResult,
};

/// Publishes every task as a manifest script entry.
///
/// Runs in the pre phase so the manifest component finds the finished
/// name→invocation map when it renders. Indirect mode (the default)
/// re-enters the tool; direct mode embeds the flattened command line,
/// which also forces cycle detection per task here.
pub struct ScriptRegistrar {
    mode: RunMode,
}

impl ScriptRegistrar {
    pub fn new() -> Self {
        Self {
            mode: RunMode::Indirect,
        }
    }

    pub fn with_mode(mode: RunMode) -> Self {
        Self { mode }
    }
}

impl Default for ScriptRegistrar {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ScriptRegistrar {
    fn name(&self) -> &str {
        "script-registrar"
    }

    fn pre_synthesize(&mut self, ctx: &mut SynthContext<'_>) -> ForgeResult<()> {
        let entrypoint = ctx.options().entrypoint.clone();
        let mut entries = Vec::new();
        for task in ctx.task_graph().iter() {
            let command = ctx.task_graph().render(&task.name, self.mode, &entrypoint)?;
            entries.push((task.name.clone(), command));
        }
        for (name, command) in entries {
            ctx.register_script(name, command);
        }
        Ok(())
    }
}
