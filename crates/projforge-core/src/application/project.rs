//! The composition tree: projects and their components.
//!
//! A [`Project`] owns everything that gets synthesized for one output
//! directory: the dependency ledger, the task graph, and an ordered list
//! of components. Projects nest; a sub-project synthesizes into its own
//! directory under the parent's.
//!
//! A [`Component`] is the extension contract for anything that produces
//! generated state. Each hook defaults to a no-op; concrete components
//! override the phases they care about. Components are registered at
//! construction time and belong to their project for life; there is no
//! re-parenting.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::application::context::SynthContext;
use crate::domain::{DependencyKind, DependencyLedger, DependencySnapshot, TaskGraph};
use crate::error::ForgeResult;

/// A unit of generated project state with a three-phase lifecycle.
///
/// Hook order across phases is total: every component's `pre_synthesize`
/// runs before any component's `synthesize`, which runs before any
/// `post_synthesize`. Within a phase, components run in registration
/// order. Hooks must not register new components; the tree is fixed once
/// synthesis starts.
pub trait Component {
    /// Stable name for logging and error reporting.
    fn name(&self) -> &str;

    /// Finalize derived state that other components' `synthesize` reads.
    fn pre_synthesize(&mut self, ctx: &mut SynthContext<'_>) -> ForgeResult<()> {
        let _ = ctx;
        Ok(())
    }

    /// Produce output through the emission boundary.
    fn synthesize(&mut self, ctx: &mut SynthContext<'_>) -> ForgeResult<()> {
        let _ = ctx;
        Ok(())
    }

    /// Side-effecting external actions (installs, derived rewrites).
    fn post_synthesize(&mut self, ctx: &mut SynthContext<'_>) -> ForgeResult<()> {
        let _ = ctx;
        Ok(())
    }
}

/// Per-run state shared between a project's components across phases.
///
/// Populated during `PreSynthesizing`; read-only by convention afterwards.
#[derive(Debug, Default)]
pub struct SynthState {
    /// The finalized dependency snapshot, available after the pre phase.
    pub snapshot: Option<DependencySnapshot>,
    /// Rendered script entries (name → invocation) for the manifest.
    pub scripts: BTreeMap<String, String>,
}

/// Root (or nested) composition scope.
pub struct Project {
    pub(crate) name: String,
    pub(crate) outdir: PathBuf,
    pub(crate) deps: DependencyLedger,
    pub(crate) tasks: TaskGraph,
    pub(crate) components: Vec<Box<dyn Component>>,
    pub(crate) subprojects: Vec<Project>,
    pub(crate) state: SynthState,
}

impl Project {
    pub fn new(name: impl Into<String>, outdir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            outdir: outdir.into(),
            deps: DependencyLedger::new(),
            tasks: TaskGraph::new(),
            components: Vec::new(),
            subprojects: Vec::new(),
            state: SynthState::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn outdir(&self) -> &Path {
        &self.outdir
    }

    /// Register a component. Registration order is hook order within a
    /// phase.
    pub fn add_component(&mut self, component: impl Component + 'static) {
        self.components.push(Box::new(component));
    }

    /// Attach a nested project. A relative outdir is re-rooted under this
    /// project's output directory.
    pub fn add_subproject(&mut self, mut project: Project) {
        if project.outdir.is_relative() {
            project.outdir = self.outdir.join(&project.outdir);
        }
        self.subprojects.push(project);
    }

    pub fn subprojects(&self) -> &[Project] {
        &self.subprojects
    }

    // ── Dependency declaration ────────────────────────────────────────────

    pub fn deps(&self) -> &DependencyLedger {
        &self.deps
    }

    pub fn deps_mut(&mut self) -> &mut DependencyLedger {
        &mut self.deps
    }

    /// Declare runtime dependencies (`name` or `name@range`).
    pub fn add_deps(&mut self, declarations: &[&str]) {
        for decl in declarations {
            self.deps.add(decl, DependencyKind::Runtime);
        }
    }

    pub fn add_dev_deps(&mut self, declarations: &[&str]) {
        for decl in declarations {
            self.deps.add(decl, DependencyKind::Build);
        }
    }

    pub fn add_peer_deps(&mut self, declarations: &[&str]) {
        for decl in declarations {
            self.deps.add(decl, DependencyKind::Peer);
        }
    }

    pub fn add_bundled_deps(&mut self, declarations: &[&str]) {
        for decl in declarations {
            self.deps.add(decl, DependencyKind::Bundled);
        }
    }

    pub fn add_test_deps(&mut self, declarations: &[&str]) {
        for decl in declarations {
            self.deps.add(decl, DependencyKind::Test);
        }
    }

    // ── Tasks ─────────────────────────────────────────────────────────────

    pub fn tasks(&self) -> &TaskGraph {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskGraph {
        &mut self.tasks
    }

    /// The finalized snapshot, if the pre phase has run.
    pub fn snapshot(&self) -> Option<&DependencySnapshot> {
        self.state.snapshot.as_ref()
    }
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("name", &self.name)
            .field("outdir", &self.outdir)
            .field("components", &self.components.len())
            .field("subprojects", &self.subprojects)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_subproject_outdir_is_rerooted() {
        let mut root = Project::new("root", "/work/app");
        root.add_subproject(Project::new("docs", "packages/docs"));

        assert_eq!(
            root.subprojects()[0].outdir(),
            Path::new("/work/app/packages/docs")
        );
    }

    #[test]
    fn absolute_subproject_outdir_is_kept() {
        let mut root = Project::new("root", "/work/app");
        root.add_subproject(Project::new("docs", "/elsewhere/docs"));

        assert_eq!(root.subprojects()[0].outdir(), Path::new("/elsewhere/docs"));
    }

    #[test]
    fn dependency_helpers_type_the_declarations() {
        let mut project = Project::new("demo", "/tmp/demo");
        project.add_deps(&["left-pad"]);
        project.add_dev_deps(&["test-lib@^3"]);
        project.add_peer_deps(&["react@^16"]);

        let kinds: Vec<DependencyKind> =
            project.deps().all().iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DependencyKind::Runtime,
                DependencyKind::Build,
                DependencyKind::Peer
            ]
        );
    }
}
