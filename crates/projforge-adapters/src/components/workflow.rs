//! CI workflow component (GitHub Actions).
//!
//! The job bodies are plumbing, not logic: each configured task becomes a
//! run step through its indirect invocation, and a frozen re-synthesis
//! plus working-tree diff guards against drifted generated files. The
//! workflow's semantic correctness is CI's concern, not validated here.

use std::collections::BTreeMap;

use serde::Serialize;

use projforge_core::{
    application::{ApplicationError, Component, SynthContext},
    domain::RunMode,
    error::ForgeResult,
};

use super::GENERATED_HEADER;

#[derive(Serialize)]
struct WorkflowDoc {
    name: String,
    #[serde(rename = "on")]
    triggers: Vec<String>,
    jobs: BTreeMap<String, JobDoc>,
}

#[derive(Serialize)]
struct JobDoc {
    #[serde(rename = "runs-on")]
    runs_on: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    env: BTreeMap<String, String>,
    steps: Vec<StepDoc>,
}

#[derive(Serialize)]
struct StepDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uses: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    run: Option<String>,
}

impl StepDoc {
    fn uses(name: &str, uses: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            uses: Some(uses.to_string()),
            run: None,
        }
    }

    fn run(name: &str, run: String) -> Self {
        Self {
            name: Some(name.to_string()),
            uses: None,
            run: Some(run),
        }
    }
}

/// Emits `.github/workflows/<name>.yml` running the configured tasks.
pub struct CiWorkflow {
    workflow_name: String,
    task_names: Vec<String>,
}

impl CiWorkflow {
    pub fn new(workflow_name: impl Into<String>) -> Self {
        Self {
            workflow_name: workflow_name.into(),
            task_names: Vec::new(),
        }
    }

    /// Add a task to run as a CI step, in order.
    pub fn run_task(mut self, task_name: impl Into<String>) -> Self {
        self.task_names.push(task_name.into());
        self
    }
}

impl Component for CiWorkflow {
    fn name(&self) -> &str {
        "ci-workflow"
    }

    fn synthesize(&mut self, ctx: &mut SynthContext<'_>) -> ForgeResult<()> {
        let entrypoint = ctx.options().entrypoint.clone();

        let mut steps = vec![
            StepDoc::uses("Checkout", "actions/checkout@v4"),
            StepDoc::run("Install dependencies", "npm ci".to_string()),
        ];
        if ctx.options().anti_tamper {
            steps.push(StepDoc::run(
                "Re-synthesize",
                format!("{entrypoint} synth --frozen"),
            ));
            steps.push(StepDoc::run(
                "Check for drift",
                "git diff --ignore-space-at-eol --exit-code".to_string(),
            ));
        }
        for task_name in &self.task_names {
            let invocation = ctx
                .task_graph()
                .render(task_name, RunMode::Indirect, &entrypoint)?;
            steps.push(StepDoc::run(task_name, invocation));
        }

        let mut jobs = BTreeMap::new();
        jobs.insert(
            "build".to_string(),
            JobDoc {
                runs_on: "ubuntu-latest".to_string(),
                env: [("CI".to_string(), "true".to_string())].into_iter().collect(),
                steps,
            },
        );

        let doc = WorkflowDoc {
            name: self.workflow_name.clone(),
            triggers: vec!["push".to_string(), "pull_request".to_string()],
            jobs,
        };

        let rel = format!(".github/workflows/{}.yml", self.workflow_name);
        let yaml = serde_yaml::to_string(&doc).map_err(|e| ApplicationError::EmitFailed {
            path: rel.clone().into(),
            reason: e.to_string(),
        })?;
        let text = format!("# {GENERATED_HEADER}\n{yaml}");
        ctx.write_file(&rel, &text)
    }
}
