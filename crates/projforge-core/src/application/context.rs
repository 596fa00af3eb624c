//! Per-phase synthesis context handed to component hooks.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::warn;

use crate::application::ports::{CommandRunner, Emitter, PackageRegistry};
use crate::application::project::SynthState;
use crate::domain::{DependencyLedger, DependencySnapshot, TaskGraph};
use crate::error::ForgeResult;

/// Options controlling one synthesis run.
#[derive(Debug, Clone)]
pub struct SynthOptions {
    /// Pin peer dependencies into the dev bucket at their range minimum.
    pub peer_pinning: bool,
    /// Enforce the generated-file drift check in frozen runs.
    pub anti_tamper: bool,
    /// CI / frozen execution: installs are strict and drift is fatal.
    /// Threaded explicitly; never read from ambient process state.
    pub frozen: bool,
    /// Binary name the indirect task render re-enters.
    pub entrypoint: String,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            peer_pinning: false,
            anti_tamper: true,
            frozen: false,
            entrypoint: "projforge".to_string(),
        }
    }
}

/// What happened to one emitted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Content differed (or the file was new) and was written.
    Written,
    /// Content was byte-identical; nothing was touched.
    Unchanged,
}

/// One tracked file emission.
#[derive(Debug, Clone)]
pub struct EmittedFile {
    pub path: PathBuf,
    pub outcome: FileOutcome,
    /// SHA-256 of the content found on disk before the write, if any.
    pub prior_digest: Option<String>,
    /// SHA-256 of the rendered content.
    pub digest: String,
}

/// Outcome summary of a full synthesis run.
#[derive(Debug, Default)]
pub struct SynthReport {
    pub files: Vec<EmittedFile>,
    pub warnings: Vec<String>,
}

impl SynthReport {
    pub fn written(&self) -> impl Iterator<Item = &EmittedFile> {
        self.files
            .iter()
            .filter(|f| f.outcome == FileOutcome::Written)
    }

    pub fn unchanged(&self) -> impl Iterator<Item = &EmittedFile> {
        self.files
            .iter()
            .filter(|f| f.outcome == FileOutcome::Unchanged)
    }
}

fn digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Everything a component hook may touch during one phase.
///
/// Borrows are split per project: the ledger, task graph, and shared
/// state belong to the component's own project; the ports and options
/// are run-wide.
pub struct SynthContext<'a> {
    pub(crate) project_name: &'a str,
    pub(crate) outdir: &'a Path,
    pub(crate) deps: &'a mut DependencyLedger,
    pub(crate) tasks: &'a mut TaskGraph,
    pub(crate) state: &'a mut SynthState,
    pub(crate) emitter: &'a dyn Emitter,
    pub(crate) registry: &'a dyn PackageRegistry,
    pub(crate) runner: &'a dyn CommandRunner,
    pub(crate) options: &'a SynthOptions,
    pub(crate) report: &'a mut SynthReport,
}

impl<'a> SynthContext<'a> {
    pub fn project_name(&self) -> &str {
        self.project_name
    }

    pub fn outdir(&self) -> &Path {
        self.outdir
    }

    pub fn options(&self) -> &SynthOptions {
        self.options
    }

    // ── Project state ─────────────────────────────────────────────────────

    pub fn deps(&mut self) -> &mut DependencyLedger {
        self.deps
    }

    pub fn tasks(&mut self) -> &mut TaskGraph {
        self.tasks
    }

    pub fn task_graph(&self) -> &TaskGraph {
        self.tasks
    }

    /// The finalized snapshot. `None` until the pre phase completes for
    /// the owning project.
    pub fn snapshot(&self) -> Option<&DependencySnapshot> {
        self.state.snapshot.as_ref()
    }

    pub fn snapshot_mut(&mut self) -> Option<&mut DependencySnapshot> {
        self.state.snapshot.as_mut()
    }

    /// Published script entries (name → invocation).
    pub fn scripts(&self) -> &BTreeMap<String, String> {
        &self.state.scripts
    }

    /// Publish a script entry for the manifest to embed.
    pub fn register_script(&mut self, name: impl Into<String>, command: impl Into<String>) {
        self.state.scripts.insert(name.into(), command.into());
    }

    // ── Collaborators ─────────────────────────────────────────────────────

    pub fn registry(&self) -> &dyn PackageRegistry {
        self.registry
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner
    }

    // ── Emission ──────────────────────────────────────────────────────────

    /// Write a generated file under the project's output directory.
    ///
    /// Idempotent: byte-identical content is detected and skipped, so a
    /// second synthesis over an unchanged project touches nothing. Every
    /// call is tracked in the run report with before/after digests; the
    /// orchestrator uses those for the frozen-run drift check.
    pub fn write_file(&mut self, rel: impl AsRef<Path>, content: &str) -> ForgeResult<()> {
        let path = self.outdir.join(rel.as_ref());
        let existing = self.emitter.read_file(&path)?;
        let new_digest = digest(content);

        if existing.as_deref() == Some(content) {
            self.report.files.push(EmittedFile {
                path,
                outcome: FileOutcome::Unchanged,
                prior_digest: Some(new_digest.clone()),
                digest: new_digest,
            });
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            self.emitter.create_dir_all(parent)?;
        }
        self.emitter.write_file(&path, content)?;
        self.report.files.push(EmittedFile {
            path,
            outcome: FileOutcome::Written,
            prior_digest: existing.as_deref().map(digest),
            digest: new_digest,
        });
        Ok(())
    }

    /// Read a file under the project's output directory.
    pub fn read_file(&self, rel: impl AsRef<Path>) -> ForgeResult<Option<String>> {
        self.emitter.read_file(&self.outdir.join(rel.as_ref()))
    }

    /// Report a non-fatal condition. Warnings never alter control flow.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(project = %self.project_name, "{message}");
        self.report.warnings.push(message);
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_hex_sha256() {
        assert_eq!(
            digest("hello\n"),
            "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
        );
    }

    #[test]
    fn default_options_are_unfrozen_with_tamper_check() {
        let options = SynthOptions::default();
        assert!(!options.frozen);
        assert!(options.anti_tamper);
        assert_eq!(options.entrypoint, "projforge");
    }
}
