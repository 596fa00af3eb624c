//! Command runner implementations.
//!
//! Task execution is optimistic, sequential, and delegated to an
//! external shell; nothing here retries or parallelizes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};

use projforge_core::{
    application::{ApplicationError, ports::CommandRunner},
    error::ForgeResult,
};
use tracing::info;

/// Production runner: `sh -c <command>` in the given directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellRunner {
    fn run(
        &self,
        command: &str,
        cwd: &Path,
        env: &BTreeMap<String, String>,
    ) -> ForgeResult<()> {
        info!(%command, cwd = %cwd.display(), "running");
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(cwd)
            .envs(env)
            .status()
            .map_err(|e| ApplicationError::InstallFailed {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ApplicationError::InstallFailed {
                command: command.to_string(),
                reason: format!("exited with {status}"),
            }
            .into())
        }
    }
}

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    pub command: String,
    pub cwd: PathBuf,
    pub env: BTreeMap<String, String>,
}

/// Test runner: records invocations instead of executing them.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    commands: Arc<Mutex<Vec<RecordedCommand>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.commands.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(
        &self,
        command: &str,
        cwd: &Path,
        env: &BTreeMap<String, String>,
    ) -> ForgeResult<()> {
        self.commands.lock().unwrap().push(RecordedCommand {
            command: command.to_string(),
            cwd: cwd.to_path_buf(),
            env: env.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_runner_reports_nonzero_exit() {
        let runner = ShellRunner::new();
        let err = runner
            .run("exit 3", Path::new("."), &BTreeMap::new())
            .unwrap_err();
        assert!(err.to_string().contains("exit 3"));
    }

    #[test]
    fn shell_runner_succeeds_on_true() {
        let runner = ShellRunner::new();
        assert!(runner.run("true", Path::new("."), &BTreeMap::new()).is_ok());
    }

    #[test]
    fn recording_runner_captures_invocations_in_order() {
        let runner = RecordingRunner::new();
        let env: BTreeMap<String, String> =
            [("CI".to_string(), "true".to_string())].into_iter().collect();

        runner.run("npm ci", Path::new("/out"), &env).unwrap();
        runner.run("npm test", Path::new("/out"), &BTreeMap::new()).unwrap();

        let commands = runner.commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].command, "npm ci");
        assert_eq!(commands[0].env.get("CI").unwrap(), "true");
        assert_eq!(commands[1].command, "npm test");
    }
}
