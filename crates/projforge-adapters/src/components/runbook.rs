//! The machine-readable task runbook.
//!
//! `projforge run <task>` re-enters the tool in a fresh process; the
//! runbook is how task definitions survive between synthesis and that
//! re-entry. The format is the task graph itself, serialized: graph
//! environment plus tasks in definition order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use projforge_core::{
    application::{ApplicationError, Component, SynthContext},
    domain::{DomainError, Task, TaskGraph},
    error::ForgeResult,
};

/// Where the runbook lives, relative to the project output directory.
pub const RUNBOOK_PATH: &str = ".projforge/tasks.json";

/// Serialized form of a task graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunbookFile {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    pub tasks: Vec<Task>,
}

impl RunbookFile {
    pub fn from_graph(graph: &TaskGraph) -> Self {
        Self {
            env: graph.environment().clone(),
            tasks: graph.iter().cloned().collect(),
        }
    }

    /// Rebuild the task graph, re-validating name uniqueness.
    pub fn into_graph(self) -> Result<TaskGraph, DomainError> {
        TaskGraph::from_parts(self.env, self.tasks)
    }
}

/// Writes the runbook during synthesis.
pub struct TasksManifest;

impl Component for TasksManifest {
    fn name(&self) -> &str {
        "tasks-manifest"
    }

    fn synthesize(&mut self, ctx: &mut SynthContext<'_>) -> ForgeResult<()> {
        let runbook = RunbookFile::from_graph(ctx.task_graph());
        let text = format!(
            "{}\n",
            serde_json::to_string_pretty(&runbook).map_err(|e| {
                ApplicationError::EmitFailed {
                    path: RUNBOOK_PATH.into(),
                    reason: e.to_string(),
                }
            })?
        );
        ctx.write_file(RUNBOOK_PATH, &text)
    }
}
