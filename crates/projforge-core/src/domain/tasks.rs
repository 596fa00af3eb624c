//! Named, composable units of shell work.
//!
//! # Design
//!
//! A [`Task`] is an ordered list of steps; a step either runs a literal
//! shell fragment or spawns another task by name. Spawns are resolved
//! lazily (a task may reference one defined later), so the graph is only
//! validated when it is flattened or explicitly checked. Flattening
//! inlines a spawned task's steps at the point of the spawn call, giving a
//! single deterministic linear command sequence.
//!
//! Execution itself is delegated to the command-runner port; this module
//! never touches a shell.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

// ── TaskCategory ──────────────────────────────────────────────────────────────

/// Coarse grouping used for display and CI wiring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Build,
    Test,
    Release,
    Maintenance,
    #[default]
    Misc,
}

impl TaskCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Test => "test",
            Self::Release => "release",
            Self::Maintenance => "maintenance",
            Self::Misc => "misc",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "build" => Ok(Self::Build),
            "test" => Ok(Self::Test),
            "release" => Ok(Self::Release),
            "maintenance" | "maint" => Ok(Self::Maintenance),
            "misc" | "" => Ok(Self::Misc),
            other => Err(DomainError::InvalidConfiguration(format!(
                "unknown task category: {other}"
            ))),
        }
    }
}

// ── RunMode ───────────────────────────────────────────────────────────────────

/// How a task invocation is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Re-enter the tool: `<entrypoint> run <task>`.
    Indirect,
    /// Inline the accumulated steps as one joined shell command line.
    Direct,
}

impl FromStr for RunMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "indirect" => Ok(Self::Indirect),
            "direct" => Ok(Self::Direct),
            other => Err(DomainError::InvalidRunMode {
                mode: other.to_string(),
            }),
        }
    }
}

// ── Task ──────────────────────────────────────────────────────────────────────

/// One step of a task, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStep {
    /// A literal shell fragment.
    Exec(String),
    /// A reference to another task, inlined at this position.
    Spawn(String),
}

/// A named unit of shell work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    #[serde(default)]
    pub category: TaskCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<TaskStep>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl Task {
    /// Append a literal shell step.
    pub fn exec(&mut self, command: impl Into<String>) -> &mut Self {
        self.steps.push(TaskStep::Exec(command.into()));
        self
    }

    /// Append a reference step to another task (resolved at render time).
    pub fn spawn(&mut self, task_name: impl Into<String>) -> &mut Self {
        self.steps.push(TaskStep::Spawn(task_name.into()));
        self
    }

    /// Set a task-level environment variable.
    pub fn env(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.env.insert(name.into(), value.into());
        self
    }
}

// ── TaskGraph ─────────────────────────────────────────────────────────────────

/// All tasks of one project, plus graph-wide environment.
#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    index: HashMap<String, usize>,
    env: BTreeMap<String, String>,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new task. Names are unique within the graph.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        category: TaskCategory,
        description: Option<&str>,
    ) -> Result<&mut Task, DomainError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(DomainError::DuplicateTask { name });
        }
        self.index.insert(name.clone(), self.tasks.len());
        self.tasks.push(Task {
            name,
            category,
            description: description.map(str::to_string),
            steps: Vec::new(),
            env: BTreeMap::new(),
        });
        Ok(self.tasks.last_mut().unwrap())
    }

    /// Rebuild a graph from previously persisted parts (runbook loading).
    pub fn from_parts(
        env: BTreeMap<String, String>,
        tasks: Vec<Task>,
    ) -> Result<Self, DomainError> {
        let mut graph = Self {
            env,
            ..Self::default()
        };
        for task in tasks {
            if graph.index.contains_key(&task.name) {
                return Err(DomainError::DuplicateTask { name: task.name });
            }
            graph.index.insert(task.name.clone(), graph.tasks.len());
            graph.tasks.push(task);
        }
        Ok(graph)
    }

    /// Set a graph-wide environment variable, visible to every task.
    pub fn add_environment(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.env.insert(name.into(), value.into());
    }

    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.index.get(name).map(|&i| &self.tasks[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Task> {
        self.index.get(name).map(|&i| &mut self.tasks[i])
    }

    /// Tasks in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Graph environment overlaid by the task's own environment.
    pub fn resolved_env(&self, name: &str) -> Result<BTreeMap<String, String>, DomainError> {
        let task = self.get(name).ok_or_else(|| DomainError::UnknownTask {
            name: name.to_string(),
        })?;
        let mut env = self.env.clone();
        env.extend(task.env.clone());
        Ok(env)
    }

    /// Render the single invocation string for a task under a mode.
    ///
    /// `entrypoint` is the binary the indirect mode re-enters (normally
    /// `projforge`); direct mode ignores it and inlines the flattened
    /// steps instead.
    pub fn render(
        &self,
        name: &str,
        mode: RunMode,
        entrypoint: &str,
    ) -> Result<String, DomainError> {
        match mode {
            RunMode::Indirect => {
                if self.get(name).is_none() {
                    return Err(DomainError::UnknownTask {
                        name: name.to_string(),
                    });
                }
                Ok(format!("{entrypoint} run {name}"))
            }
            RunMode::Direct => Ok(self.flatten(name)?.join("; ")),
        }
    }

    /// Flatten a task into its linear command sequence.
    ///
    /// Spawned tasks are inlined at the point of the spawn call, each
    /// occurrence separately, preserving sibling step order at every
    /// level. Cycles abort before any command is produced.
    pub fn flatten(&self, name: &str) -> Result<Vec<String>, DomainError> {
        let mut commands = Vec::new();
        let mut trail = Vec::new();
        self.flatten_into(name, &mut commands, &mut trail)?;
        Ok(commands)
    }

    fn flatten_into<'a>(
        &'a self,
        name: &str,
        commands: &mut Vec<String>,
        trail: &mut Vec<&'a str>,
    ) -> Result<(), DomainError> {
        let task = self.get(name).ok_or_else(|| DomainError::UnknownTask {
            name: name.to_string(),
        })?;
        if trail.contains(&task.name.as_str()) {
            let mut chain: Vec<&str> = trail.clone();
            chain.push(&task.name);
            return Err(DomainError::TaskCycle {
                chain: chain.join(" -> "),
            });
        }
        trail.push(&task.name);
        for step in &task.steps {
            match step {
                TaskStep::Exec(command) => commands.push(command.clone()),
                TaskStep::Spawn(other) => self.flatten_into(other, commands, trail)?,
            }
        }
        trail.pop();
        Ok(())
    }

    /// Validate every spawn edge in the graph.
    ///
    /// Depth-first walk with an in-progress set distinct from a finished
    /// set; run before rendering so a cycle is reported even for tasks
    /// nobody renders this run.
    pub fn check_cycles(&self) -> Result<(), DomainError> {
        let mut visiting: HashSet<&str> = HashSet::new();
        let mut finished: HashSet<&str> = HashSet::new();
        for task in &self.tasks {
            self.visit(&task.name, &mut visiting, &mut finished, &mut Vec::new())?;
        }
        Ok(())
    }

    fn visit<'a>(
        &'a self,
        name: &str,
        visiting: &mut HashSet<&'a str>,
        finished: &mut HashSet<&'a str>,
        trail: &mut Vec<&'a str>,
    ) -> Result<(), DomainError> {
        let task = self.get(name).ok_or_else(|| DomainError::UnknownTask {
            name: name.to_string(),
        })?;
        let name = task.name.as_str();
        if finished.contains(name) {
            return Ok(());
        }
        if visiting.contains(name) {
            let mut chain: Vec<&str> = trail.clone();
            chain.push(name);
            return Err(DomainError::TaskCycle {
                chain: chain.join(" -> "),
            });
        }
        visiting.insert(name);
        trail.push(name);
        for step in &task.steps {
            if let TaskStep::Spawn(other) = step {
                self.visit(other, visiting, finished, trail)?;
            }
        }
        trail.pop();
        visiting.remove(name);
        finished.insert(name);
        Ok(())
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
