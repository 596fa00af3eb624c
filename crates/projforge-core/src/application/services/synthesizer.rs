//! Synthesizer - the three-phase orchestrator.
//!
//! One `synth()` call drives the whole component tree through
//! `PreSynthesizing → Synthesizing → PostSynthesizing`. Within each
//! phase the walk is depth-first, parent before children, registration
//! order among siblings, the same total order on every run. A failure
//! in any phase aborts the run; files already written stay written
//! (no transactional rollback).

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        context::{SynthContext, SynthOptions, SynthReport},
        ports::{CommandRunner, Emitter, PackageRegistry},
        project::Project,
    },
    domain::DependencySnapshot,
    error::ForgeResult,
};

/// Lifecycle states of one synthesis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthPhase {
    Idle,
    PreSynthesizing,
    Synthesizing,
    PostSynthesizing,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hook {
    Pre,
    Synth,
    Post,
}

/// Name of the manifest consulted for version reconciliation.
const MANIFEST_FILE: &str = "package.json";

/// Drives the component tree through the synthesis lifecycle.
///
/// Owns the boxed collaborator ports for the duration of the run.
pub struct Synthesizer {
    emitter: Box<dyn Emitter>,
    registry: Box<dyn PackageRegistry>,
    runner: Box<dyn CommandRunner>,
    options: SynthOptions,
    phase: SynthPhase,
}

impl Synthesizer {
    /// Create a new synthesizer with the given adapters.
    pub fn new(
        emitter: Box<dyn Emitter>,
        registry: Box<dyn PackageRegistry>,
        runner: Box<dyn CommandRunner>,
        options: SynthOptions,
    ) -> Self {
        Self {
            emitter,
            registry,
            runner,
            options,
            phase: SynthPhase::Idle,
        }
    }

    pub fn phase(&self) -> SynthPhase {
        self.phase
    }

    /// Synthesize the whole tree.
    ///
    /// Idempotence contract: running this twice with no intervening state
    /// change yields byte-identical output for every emitted file, with
    /// the second run reporting every file as unchanged.
    #[instrument(skip_all, fields(project = %project.name()))]
    pub fn synth(&mut self, project: &mut Project) -> ForgeResult<SynthReport> {
        let mut report = SynthReport::default();

        self.phase = SynthPhase::PreSynthesizing;
        info!("Pre-synthesis phase");
        self.walk(project, Hook::Pre, &mut report)?;

        self.phase = SynthPhase::Synthesizing;
        info!("Synthesis phase");
        self.walk(project, Hook::Synth, &mut report)?;
        self.enforce_anti_tamper(&report)?;

        self.phase = SynthPhase::PostSynthesizing;
        info!("Post-synthesis phase");
        self.walk(project, Hook::Post, &mut report)?;

        self.phase = SynthPhase::Done;
        info!(
            written = report.written().count(),
            unchanged = report.unchanged().count(),
            warnings = report.warnings.len(),
            "Synthesis complete"
        );
        Ok(report)
    }

    /// Run one hook over a project and, depth-first, its sub-projects.
    fn walk(
        &self,
        project: &mut Project,
        hook: Hook,
        report: &mut SynthReport,
    ) -> ForgeResult<()> {
        // Components are taken out for the duration of the phase so hooks
        // can borrow the rest of the project state mutably. Hooks must
        // not register new components (the tree is fixed at synth time).
        let mut components = std::mem::take(&mut project.components);
        let result: ForgeResult<()> = (|| {
            for component in &mut components {
                debug!(component = component.name(), ?hook, "hook");
                let mut ctx = SynthContext {
                    project_name: &project.name,
                    outdir: &project.outdir,
                    deps: &mut project.deps,
                    tasks: &mut project.tasks,
                    state: &mut project.state,
                    emitter: self.emitter.as_ref(),
                    registry: self.registry.as_ref(),
                    runner: self.runner.as_ref(),
                    options: &self.options,
                    report: &mut *report,
                };
                match hook {
                    Hook::Pre => component.pre_synthesize(&mut ctx)?,
                    Hook::Synth => component.synthesize(&mut ctx)?,
                    Hook::Post => component.post_synthesize(&mut ctx)?,
                }
            }
            Ok(())
        })();
        project.components = components;
        result?;

        if hook == Hook::Pre {
            self.finalize_project(project, report)?;
        }

        for child in &mut project.subprojects {
            self.walk(child, hook, report)?;
        }
        Ok(())
    }

    /// End of a project's pre phase: validate the task graph and freeze
    /// the ledger into its snapshot, reconciled against the prior
    /// manifest. Components read the result in the next phase; nothing
    /// may depend on ledger or task-graph contents before this point.
    fn finalize_project(&self, project: &mut Project, report: &mut SynthReport) -> ForgeResult<()> {
        project.tasks.check_cycles()?;

        let mut snapshot = project.deps.render(self.options.peer_pinning)?;
        if let Some(prior) = self.load_prior_manifest(&project.outdir)? {
            for name in snapshot.reconcile(&prior) {
                let message = format!("dependency '{name}' is no longer declared");
                tracing::warn!(project = %project.name, "{message}");
                report.warnings.push(message);
            }
        }
        debug!(
            runtime = snapshot.runtime.len(),
            dev = snapshot.dev.len(),
            peer = snapshot.peer.len(),
            "Ledger finalized"
        );
        project.state.snapshot = Some(snapshot);
        Ok(())
    }

    fn load_prior_manifest(&self, outdir: &Path) -> ForgeResult<Option<DependencySnapshot>> {
        let path = outdir.join(MANIFEST_FILE);
        let Some(text) = self.emitter.read_file(&path)? else {
            return Ok(None);
        };
        let prior =
            serde_json::from_str(&text).map_err(|e| ApplicationError::ManifestParse {
                path,
                reason: e.to_string(),
            })?;
        Ok(Some(prior))
    }

    /// Frozen-run drift check, applied after the synth phase.
    ///
    /// Any tracked file whose rendered content differs from what was on
    /// disk before the phase means the committed output is stale.
    fn enforce_anti_tamper(&self, report: &SynthReport) -> ForgeResult<()> {
        if !(self.options.anti_tamper && self.options.frozen) {
            return Ok(());
        }
        let changed: Vec<PathBuf> = report.written().map(|f| f.path.clone()).collect();
        if changed.is_empty() {
            Ok(())
        } else {
            Err(ApplicationError::TamperDetected { paths: changed }.into())
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::context::FileOutcome;
    use crate::application::project::Component;
    use crate::domain::{DependencyKind, TaskCategory};
    use std::collections::{BTreeMap, HashMap};
    use std::sync::{Arc, RwLock};

    // Minimal in-crate test doubles; the adapters crate ships the real
    // in-memory implementations.
    #[derive(Clone, Default)]
    struct TestEmitter {
        files: Arc<RwLock<HashMap<PathBuf, String>>>,
    }

    impl Emitter for TestEmitter {
        fn create_dir_all(&self, _path: &Path) -> ForgeResult<()> {
            Ok(())
        }
        fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()> {
            self.files
                .write()
                .map_err(|_| ApplicationError::EmitterLockPoisoned)?
                .insert(path.to_path_buf(), content.to_string());
            Ok(())
        }
        fn read_file(&self, path: &Path) -> ForgeResult<Option<String>> {
            Ok(self
                .files
                .read()
                .map_err(|_| ApplicationError::EmitterLockPoisoned)?
                .get(path)
                .cloned())
        }
        fn exists(&self, path: &Path) -> bool {
            self.files.read().map(|f| f.contains_key(path)).unwrap_or(false)
        }
    }

    struct NoRegistry;
    impl PackageRegistry for NoRegistry {
        fn resolve(&self, _outdir: &Path, _name: &str) -> Option<String> {
            None
        }
    }

    struct NoRunner;
    impl CommandRunner for NoRunner {
        fn run(
            &self,
            _command: &str,
            _cwd: &Path,
            _env: &BTreeMap<String, String>,
        ) -> ForgeResult<()> {
            Ok(())
        }
    }

    struct StubFile {
        rel: &'static str,
        content: &'static str,
    }

    impl Component for StubFile {
        fn name(&self) -> &str {
            "stub-file"
        }
        fn synthesize(&mut self, ctx: &mut SynthContext<'_>) -> ForgeResult<()> {
            let content = self.content.to_string();
            ctx.write_file(self.rel, &content)
        }
    }

    /// Records the phase order it was driven through.
    #[derive(Default)]
    struct PhaseRecorder {
        log: Arc<RwLock<Vec<String>>>,
        tag: &'static str,
    }

    impl Component for PhaseRecorder {
        fn name(&self) -> &str {
            "phase-recorder"
        }
        fn pre_synthesize(&mut self, _ctx: &mut SynthContext<'_>) -> ForgeResult<()> {
            self.log.write().unwrap().push(format!("{}:pre", self.tag));
            Ok(())
        }
        fn synthesize(&mut self, _ctx: &mut SynthContext<'_>) -> ForgeResult<()> {
            self.log.write().unwrap().push(format!("{}:synth", self.tag));
            Ok(())
        }
        fn post_synthesize(&mut self, _ctx: &mut SynthContext<'_>) -> ForgeResult<()> {
            self.log.write().unwrap().push(format!("{}:post", self.tag));
            Ok(())
        }
    }

    fn synthesizer(emitter: TestEmitter, options: SynthOptions) -> Synthesizer {
        Synthesizer::new(
            Box::new(emitter),
            Box::new(NoRegistry),
            Box::new(NoRunner),
            options,
        )
    }

    #[test]
    fn phases_run_in_total_order_across_the_tree() {
        let log = Arc::new(RwLock::new(Vec::new()));
        let mut root = Project::new("root", "/out");
        root.add_component(PhaseRecorder { log: log.clone(), tag: "root-a" });
        root.add_component(PhaseRecorder { log: log.clone(), tag: "root-b" });
        let mut child = Project::new("child", "pkg");
        child.add_component(PhaseRecorder { log: log.clone(), tag: "child" });
        root.add_subproject(child);

        let mut synth = synthesizer(TestEmitter::default(), SynthOptions::default());
        synth.synth(&mut root).unwrap();

        let entries = log.read().unwrap().clone();
        assert_eq!(
            entries,
            vec![
                "root-a:pre", "root-b:pre", "child:pre",
                "root-a:synth", "root-b:synth", "child:synth",
                "root-a:post", "root-b:post", "child:post",
            ]
        );
        assert_eq!(synth.phase(), SynthPhase::Done);
    }

    #[test]
    fn snapshot_is_available_after_pre_phase() {
        let mut project = Project::new("demo", "/out");
        project.add_deps(&["left-pad"]);

        let mut synth = synthesizer(TestEmitter::default(), SynthOptions::default());
        synth.synth(&mut project).unwrap();

        let snapshot = project.snapshot().unwrap();
        assert_eq!(snapshot.runtime.get("left-pad").unwrap(), "*");
    }

    #[test]
    fn second_run_reports_files_unchanged() {
        let emitter = TestEmitter::default();
        let mut project = Project::new("demo", "/out");
        project.add_component(StubFile { rel: ".gitignore", content: "node_modules/\n" });

        let mut synth = synthesizer(emitter.clone(), SynthOptions::default());
        let first = synth.synth(&mut project).unwrap();
        assert_eq!(first.written().count(), 1);

        let mut synth = synthesizer(emitter, SynthOptions::default());
        let second = synth.synth(&mut project).unwrap();
        assert_eq!(second.written().count(), 0);
        assert_eq!(second.unchanged().count(), 1);
    }

    #[test]
    fn frozen_run_fails_on_drift() {
        let emitter = TestEmitter::default();
        let mut project = Project::new("demo", "/out");
        project.add_component(StubFile { rel: ".gitignore", content: "node_modules/\n" });

        let options = SynthOptions {
            frozen: true,
            ..SynthOptions::default()
        };
        let mut synth = synthesizer(emitter, options);
        let err = synth.synth(&mut project).unwrap_err();
        assert!(err.to_string().contains(".gitignore"));
    }

    #[test]
    fn frozen_run_passes_when_output_is_current() {
        let emitter = TestEmitter::default();
        let mut project = Project::new("demo", "/out");
        project.add_component(StubFile { rel: ".gitignore", content: "node_modules/\n" });

        // First, an unfrozen run materializes the files.
        let mut synth = synthesizer(emitter.clone(), SynthOptions::default());
        synth.synth(&mut project).unwrap();

        // A frozen run over current output is clean.
        let options = SynthOptions {
            frozen: true,
            ..SynthOptions::default()
        };
        let mut synth = synthesizer(emitter, options);
        let report = synth.synth(&mut project).unwrap();
        assert_eq!(report.written().count(), 0);
    }

    #[test]
    fn prior_manifest_feeds_reconciliation() {
        let emitter = TestEmitter::default();
        emitter
            .write_file(
                Path::new("/out/package.json"),
                r#"{"dependencies":{"foo":"^1.2.0","gone":"2.0.0"}}"#,
            )
            .unwrap();

        let mut project = Project::new("demo", "/out");
        project.add_deps(&["foo"]);

        let mut synth = synthesizer(emitter, SynthOptions::default());
        let report = synth.synth(&mut project).unwrap();

        assert_eq!(
            project.snapshot().unwrap().runtime.get("foo").unwrap(),
            "^1.2.0"
        );
        assert!(report.warnings.iter().any(|w| w.contains("gone")));
    }

    #[test]
    fn unparsable_prior_manifest_is_fatal() {
        let emitter = TestEmitter::default();
        emitter
            .write_file(Path::new("/out/package.json"), "not json")
            .unwrap();

        let mut project = Project::new("demo", "/out");
        let mut synth = synthesizer(emitter, SynthOptions::default());
        assert!(synth.synth(&mut project).is_err());
    }

    #[test]
    fn task_cycle_aborts_during_pre_phase() {
        let mut project = Project::new("demo", "/out");
        project
            .tasks_mut()
            .define("x", TaskCategory::Misc, None)
            .unwrap()
            .spawn("y");
        project
            .tasks_mut()
            .define("y", TaskCategory::Misc, None)
            .unwrap()
            .spawn("x");
        // A component that would write; the cycle must abort first.
        project.add_component(StubFile { rel: "never.txt", content: "x" });

        let emitter = TestEmitter::default();
        let mut synth = synthesizer(emitter.clone(), SynthOptions::default());
        assert!(synth.synth(&mut project).is_err());
        assert!(!emitter.exists(Path::new("/out/never.txt")));
    }

    #[test]
    fn role_conflict_aborts_the_run() {
        let mut project = Project::new("demo", "/out");
        project.add_peer_deps(&["baz"]);
        project.add_bundled_deps(&["baz"]);

        let mut synth = synthesizer(TestEmitter::default(), SynthOptions::default());
        let err = synth.synth(&mut project).unwrap_err();
        assert!(err.to_string().contains("baz"));
    }

    #[test]
    fn end_to_end_scenario_matches_expected_buckets() {
        let mut project = Project::new("demo", "/out");
        project.add_deps(&["left-pad"]);
        project.add_dev_deps(&["test-lib@^3"]);
        project.add_peer_deps(&["react@^16"]);

        let options = SynthOptions {
            peer_pinning: true,
            ..SynthOptions::default()
        };
        let mut synth = synthesizer(TestEmitter::default(), options);
        synth.synth(&mut project).unwrap();

        let snapshot = project.snapshot().unwrap();
        assert_eq!(snapshot.runtime.get("left-pad").unwrap(), "*");
        assert_eq!(snapshot.peer.get("react").unwrap(), "^16");
        assert_eq!(snapshot.dev.get("test-lib").unwrap(), "^3");
        assert_eq!(snapshot.dev.get("react").unwrap(), "16.0.0");
    }

    #[test]
    fn outcome_variants_are_tracked_per_file() {
        let emitter = TestEmitter::default();
        emitter
            .write_file(Path::new("/out/a.txt"), "old")
            .unwrap();

        let mut project = Project::new("demo", "/out");
        project.add_component(StubFile { rel: "a.txt", content: "new" });
        project.add_component(StubFile { rel: "b.txt", content: "fresh" });

        let mut synth = synthesizer(emitter, SynthOptions::default());
        let report = synth.synth(&mut project).unwrap();

        let a = report.files.iter().find(|f| f.path.ends_with("a.txt")).unwrap();
        assert_eq!(a.outcome, FileOutcome::Written);
        assert!(a.prior_digest.is_some());

        let b = report.files.iter().find(|f| f.path.ends_with("b.txt")).unwrap();
        assert_eq!(b.outcome, FileOutcome::Written);
        assert!(b.prior_digest.is_none());
    }

    #[test]
    fn emitter_failure_aborts_the_run() {
        use crate::application::ports::MockEmitter;

        let mut mock = MockEmitter::new();
        mock.expect_read_file().returning(|path| {
            Err(ApplicationError::EmitFailed {
                path: path.to_path_buf(),
                reason: "disk on fire".into(),
            }
            .into())
        });

        let mut project = Project::new("demo", "/out");
        let mut synth = Synthesizer::new(
            Box::new(mock),
            Box::new(NoRegistry),
            Box::new(NoRunner),
            SynthOptions::default(),
        );
        let err = synth.synth(&mut project).unwrap_err();
        assert!(err.to_string().contains("disk on fire"));
    }

    #[test]
    fn ledger_overwrite_never_duplicates_entries_across_runs() {
        let mut project = Project::new("demo", "/out");
        project.deps_mut().add("foo@^1", DependencyKind::Runtime);
        project.deps_mut().add("foo@^1", DependencyKind::Runtime);

        let mut synth = synthesizer(TestEmitter::default(), SynthOptions::default());
        synth.synth(&mut project).unwrap();
        assert_eq!(project.deps().all().len(), 1);
    }
}
