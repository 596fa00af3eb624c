//! The dependency ledger: declared package dependencies, typed by role.
//!
//! # Design
//!
//! The ledger is an append/overwrite log keyed by `(name, kind)`: adding
//! the same name under the same kind twice replaces the earlier entry in
//! place, so insertion order is stable. Nothing here touches the
//! filesystem or a registry; rendering produces a plain
//! [`DependencySnapshot`](super::snapshot::DependencySnapshot) for
//! collaborators to serialize.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::snapshot::DependencySnapshot;
use crate::domain::version::VersionSpec;

// ── DependencyKind ────────────────────────────────────────────────────────────

/// The declared purpose of a package dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyKind {
    /// Needed at runtime by consumers of the package.
    Runtime,
    /// Needed only to build and develop the package.
    Build,
    /// Provided by the consumer; declared to constrain the version.
    Peer,
    /// Shipped inside the published package (and also a runtime dependency).
    Bundled,
    /// Needed only by the test suite.
    Test,
    /// Needed by the development environment tooling, not the build itself.
    DevEnv,
}

impl DependencyKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::Build => "build",
            Self::Peer => "peer",
            Self::Bundled => "bundled",
            Self::Test => "test",
            Self::DevEnv => "devenv",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DependencyKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "runtime" | "prod" => Ok(Self::Runtime),
            "build" | "dev" => Ok(Self::Build),
            "peer" => Ok(Self::Peer),
            "bundled" => Ok(Self::Bundled),
            "test" => Ok(Self::Test),
            "devenv" => Ok(Self::DevEnv),
            other => Err(DomainError::InvalidConfiguration(format!(
                "unknown dependency kind: {other}"
            ))),
        }
    }
}

// ── Dependency ────────────────────────────────────────────────────────────────

/// A single declared dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    /// Declared version range; `None` renders as the wildcard `*`.
    pub spec: Option<String>,
    pub kind: DependencyKind,
}

impl Dependency {
    /// The version range this entry renders with (`*` when unspecified).
    pub fn range(&self) -> &str {
        self.spec.as_deref().unwrap_or("*")
    }
}

/// Split a declaration like `lodash@^4` into name and range.
///
/// Scoped names (`@types/node@^18`) keep their leading `@`: only the last
/// `@` that is not the first character of the declaration separates name
/// from range.
fn split_declaration(decl: &str) -> (String, Option<String>) {
    match decl.rfind('@') {
        Some(idx) if idx > 0 => {
            let (name, range) = decl.split_at(idx);
            (name.to_string(), Some(range[1..].to_string()))
        }
        _ => (decl.to_string(), None),
    }
}

// ── DependencyLedger ──────────────────────────────────────────────────────────

/// Running set of declared dependencies for one project.
#[derive(Debug, Clone, Default)]
pub struct DependencyLedger {
    entries: Vec<Dependency>,
}

impl DependencyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a dependency, parsing an optional inline `name@range` suffix.
    ///
    /// Re-declaring the same `(name, kind)` pair overwrites the earlier
    /// entry in place. Never fails for well-formed input; role conflicts
    /// are detected when the ledger is rendered.
    pub fn add(&mut self, declaration: &str, kind: DependencyKind) {
        let (name, spec) = split_declaration(declaration);
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|d| d.name == name && d.kind == kind)
        {
            existing.spec = spec;
            return;
        }
        self.entries.push(Dependency { name, spec, kind });
    }

    /// All declared entries, in insertion order.
    pub fn all(&self) -> &[Dependency] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the ledger into a role-partitioned snapshot.
    ///
    /// With `peer_pinning` enabled, every peer dependency also produces a
    /// build dependency pinned to the minimum version of the peer's range
    /// (unless a build-flavored entry for that name was declared
    /// explicitly). A name declared as both peer and bundled is a
    /// [`DomainError::DependencyConflict`].
    pub fn render(&self, peer_pinning: bool) -> Result<DependencySnapshot, DomainError> {
        let mut snapshot = DependencySnapshot::default();
        let mut pins: Vec<(String, String)> = Vec::new();

        for entry in &self.entries {
            let range = entry.range().to_string();
            match entry.kind {
                DependencyKind::Runtime => {
                    snapshot.runtime.insert(entry.name.clone(), range);
                }
                DependencyKind::Build | DependencyKind::Test | DependencyKind::DevEnv => {
                    snapshot.dev.insert(entry.name.clone(), range);
                }
                DependencyKind::Peer => {
                    if self.is_bundled(&entry.name) {
                        return Err(DomainError::DependencyConflict {
                            name: entry.name.clone(),
                        });
                    }
                    if peer_pinning {
                        let minimum = VersionSpec::parse(&entry.name, &range)?.minimum();
                        pins.push((entry.name.clone(), minimum));
                    }
                    snapshot.peer.insert(entry.name.clone(), range);
                }
                DependencyKind::Bundled => {
                    if self.is_peer(&entry.name) {
                        return Err(DomainError::DependencyConflict {
                            name: entry.name.clone(),
                        });
                    }
                    snapshot.runtime.insert(entry.name.clone(), range);
                    snapshot.bundled.push(entry.name.clone());
                }
            }
        }

        // Pins never clobber an explicitly declared build/test/devenv entry.
        for (name, minimum) in pins {
            snapshot.dev.entry(name).or_insert(minimum);
        }

        snapshot.bundled.sort();
        snapshot.bundled.dedup();
        Ok(snapshot)
    }

    fn is_peer(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|d| d.name == name && d.kind == DependencyKind::Peer)
    }

    fn is_bundled(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|d| d.name == name && d.kind == DependencyKind::Bundled)
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_range_is_split_from_name() {
        let mut ledger = DependencyLedger::new();
        ledger.add("lodash@^4.17", DependencyKind::Runtime);
        let entry = &ledger.all()[0];
        assert_eq!(entry.name, "lodash");
        assert_eq!(entry.spec.as_deref(), Some("^4.17"));
    }

    #[test]
    fn scoped_names_are_not_mis_split() {
        let mut ledger = DependencyLedger::new();
        ledger.add("@types/node", DependencyKind::Build);
        ledger.add("@types/jest@^29", DependencyKind::Build);

        assert_eq!(ledger.all()[0].name, "@types/node");
        assert_eq!(ledger.all()[0].spec, None);
        assert_eq!(ledger.all()[1].name, "@types/jest");
        assert_eq!(ledger.all()[1].spec.as_deref(), Some("^29"));
    }

    #[test]
    fn re_adding_same_name_and_kind_overwrites() {
        let mut ledger = DependencyLedger::new();
        ledger.add("foo@^1", DependencyKind::Runtime);
        ledger.add("foo@^2", DependencyKind::Runtime);

        assert_eq!(ledger.all().len(), 1);
        assert_eq!(ledger.all()[0].spec.as_deref(), Some("^2"));
    }

    #[test]
    fn same_name_under_two_kinds_keeps_both() {
        let mut ledger = DependencyLedger::new();
        ledger.add("foo", DependencyKind::Runtime);
        ledger.add("foo@^3", DependencyKind::Test);
        assert_eq!(ledger.all().len(), 2);
    }

    #[test]
    fn render_defaults_missing_range_to_wildcard() {
        let mut ledger = DependencyLedger::new();
        ledger.add("left-pad", DependencyKind::Runtime);
        let snapshot = ledger.render(false).unwrap();
        assert_eq!(snapshot.runtime.get("left-pad").unwrap(), "*");
    }

    #[test]
    fn bundled_also_lands_in_runtime_bucket() {
        let mut ledger = DependencyLedger::new();
        ledger.add("vendored-lib@1.0.0", DependencyKind::Bundled);
        let snapshot = ledger.render(false).unwrap();

        assert_eq!(snapshot.runtime.get("vendored-lib").unwrap(), "1.0.0");
        assert_eq!(snapshot.bundled, vec!["vendored-lib"]);
    }

    #[test]
    fn peer_pinning_adds_minimum_dev_dependency() {
        let mut ledger = DependencyLedger::new();
        ledger.add("bar@^2.0.0", DependencyKind::Peer);
        let snapshot = ledger.render(true).unwrap();

        assert_eq!(snapshot.peer.get("bar").unwrap(), "^2.0.0");
        assert_eq!(snapshot.dev.get("bar").unwrap(), "2.0.0");
    }

    #[test]
    fn peer_pinning_does_not_clobber_explicit_dev_entry() {
        let mut ledger = DependencyLedger::new();
        ledger.add("bar@^2.0.0", DependencyKind::Peer);
        ledger.add("bar@2.3.0", DependencyKind::Build);
        let snapshot = ledger.render(true).unwrap();

        assert_eq!(snapshot.dev.get("bar").unwrap(), "2.3.0");
    }

    #[test]
    fn peer_pinning_disabled_adds_nothing() {
        let mut ledger = DependencyLedger::new();
        ledger.add("bar@^2.0.0", DependencyKind::Peer);
        let snapshot = ledger.render(false).unwrap();
        assert!(snapshot.dev.is_empty());
    }

    #[test]
    fn peer_and_bundled_conflict_in_either_order() {
        let mut ledger = DependencyLedger::new();
        ledger.add("baz", DependencyKind::Peer);
        ledger.add("baz", DependencyKind::Bundled);
        let err = ledger.render(false).unwrap_err();
        assert!(matches!(err, DomainError::DependencyConflict { name } if name == "baz"));

        let mut ledger = DependencyLedger::new();
        ledger.add("baz", DependencyKind::Bundled);
        ledger.add("baz", DependencyKind::Peer);
        assert!(ledger.render(false).is_err());
    }

    #[test]
    fn malformed_peer_range_fails_resolution_when_pinning() {
        let mut ledger = DependencyLedger::new();
        ledger.add("broken@^oops", DependencyKind::Peer);
        let err = ledger.render(true).unwrap_err();
        assert!(matches!(err, DomainError::UnresolvableRange { .. }));
    }

    #[test]
    fn snapshot_maps_are_sorted_by_name() {
        let mut ledger = DependencyLedger::new();
        ledger.add("zeta", DependencyKind::Runtime);
        ledger.add("alpha", DependencyKind::Runtime);
        let snapshot = ledger.render(false).unwrap();

        let names: Vec<&str> = snapshot.runtime.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
