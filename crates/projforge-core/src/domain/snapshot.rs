//! The resolved-dependency snapshot and its reconciliation rules.
//!
//! A snapshot is the plain, serializable output of rendering the ledger:
//! three name→version maps plus the bundled name list. `BTreeMap` keeps
//! every serialization deterministically sorted by key. The serde field
//! names match the package-manifest convention so a previously generated
//! manifest deserializes straight into a prior snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Role-partitioned resolved dependencies, produced once per synthesis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySnapshot {
    #[serde(
        rename = "dependencies",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub runtime: BTreeMap<String, String>,

    #[serde(
        rename = "devDependencies",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub dev: BTreeMap<String, String>,

    #[serde(
        rename = "peerDependencies",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub peer: BTreeMap<String, String>,

    #[serde(
        rename = "bundledDependencies",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub bundled: Vec<String>,
}

const WILDCARD: &str = "*";

impl DependencySnapshot {
    pub fn is_empty(&self) -> bool {
        self.runtime.is_empty() && self.dev.is_empty() && self.peer.is_empty()
    }

    /// Reconcile this snapshot against the previously persisted one.
    ///
    /// For every entry whose newly computed version is the wildcard but
    /// whose prior version was concrete, the prior value is kept; a
    /// package manager already resolved it once and an unpinned
    /// declaration is no reason to churn. The prior value is *not*
    /// re-checked against other co-declared constraints; a stale pin
    /// persists until the user pins or removes the declaration.
    ///
    /// Returns the names present in the prior snapshot but absent from
    /// this one, for the caller to report (their disappearance is not an
    /// error).
    pub fn reconcile(&mut self, prior: &DependencySnapshot) -> Vec<String> {
        fn keep_concrete(
            bucket: &mut BTreeMap<String, String>,
            prior: &BTreeMap<String, String>,
        ) {
            for (name, version) in bucket.iter_mut() {
                if version == WILDCARD {
                    if let Some(previous) = prior.get(name) {
                        if previous != WILDCARD {
                            *version = previous.clone();
                        }
                    }
                }
            }
        }

        keep_concrete(&mut self.runtime, &prior.runtime);
        keep_concrete(&mut self.dev, &prior.dev);
        keep_concrete(&mut self.peer, &prior.peer);

        let mut removed: Vec<String> = Vec::new();
        for (prior_bucket, bucket) in [
            (&prior.runtime, &self.runtime),
            (&prior.dev, &self.dev),
            (&prior.peer, &self.peer),
        ] {
            for name in prior_bucket.keys() {
                if !bucket.contains_key(name) && !removed.contains(name) {
                    removed.push(name.clone());
                }
            }
        }
        removed
    }

    /// Rewrite wildcard entries with the actually-installed version.
    ///
    /// `resolve` looks up the installed version of a package (typically
    /// backed by the registry port); a successful lookup rewrites the
    /// requirement to a caret range pinned at that version. Lookup
    /// failures are left as-is and returned for warning-level reporting.
    pub fn resolve_installed(
        &mut self,
        resolve: impl Fn(&str) -> Option<String>,
    ) -> Vec<String> {
        let mut unresolved: Vec<String> = Vec::new();
        for bucket in [&mut self.runtime, &mut self.dev, &mut self.peer] {
            for (name, version) in bucket.iter_mut() {
                if version != WILDCARD {
                    continue;
                }
                match resolve(name) {
                    Some(installed) => *version = format!("^{installed}"),
                    None => {
                        if !unresolved.contains(name) {
                            unresolved.push(name.clone());
                        }
                    }
                }
            }
        }
        unresolved
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn wildcard_keeps_prior_concrete_version() {
        let mut snapshot = DependencySnapshot {
            runtime: map(&[("foo", "*")]),
            ..Default::default()
        };
        let prior = DependencySnapshot {
            runtime: map(&[("foo", "^1.2.0")]),
            ..Default::default()
        };

        let removed = snapshot.reconcile(&prior);
        assert_eq!(snapshot.runtime.get("foo").unwrap(), "^1.2.0");
        assert!(removed.is_empty());
    }

    #[test]
    fn concrete_declaration_beats_prior_value() {
        let mut snapshot = DependencySnapshot {
            runtime: map(&[("foo", "^2.0.0")]),
            ..Default::default()
        };
        let prior = DependencySnapshot {
            runtime: map(&[("foo", "^1.2.0")]),
            ..Default::default()
        };

        snapshot.reconcile(&prior);
        assert_eq!(snapshot.runtime.get("foo").unwrap(), "^2.0.0");
    }

    #[test]
    fn prior_wildcard_does_not_overwrite_wildcard() {
        let mut snapshot = DependencySnapshot {
            dev: map(&[("foo", "*")]),
            ..Default::default()
        };
        let prior = DependencySnapshot {
            dev: map(&[("foo", "*")]),
            ..Default::default()
        };

        snapshot.reconcile(&prior);
        assert_eq!(snapshot.dev.get("foo").unwrap(), "*");
    }

    #[test]
    fn removed_names_are_reported_not_erred() {
        let mut snapshot = DependencySnapshot::default();
        let prior = DependencySnapshot {
            runtime: map(&[("gone", "^1.0.0")]),
            dev: map(&[("gone", "^1.0.0"), ("also-gone", "2.0.0")]),
            ..Default::default()
        };

        let mut removed = snapshot.reconcile(&prior);
        removed.sort();
        assert_eq!(removed, vec!["also-gone", "gone"]);
    }

    #[test]
    fn resolve_installed_pins_wildcards_to_caret() {
        let mut snapshot = DependencySnapshot {
            runtime: map(&[("foo", "*"), ("pinned", "^2.0.0")]),
            ..Default::default()
        };

        let unresolved = snapshot.resolve_installed(|name| {
            (name == "foo").then(|| "4.17.21".to_string())
        });

        assert_eq!(snapshot.runtime.get("foo").unwrap(), "^4.17.21");
        assert_eq!(snapshot.runtime.get("pinned").unwrap(), "^2.0.0");
        assert!(unresolved.is_empty());
    }

    #[test]
    fn resolve_installed_reports_lookup_misses() {
        let mut snapshot = DependencySnapshot {
            dev: map(&[("mystery", "*")]),
            ..Default::default()
        };

        let unresolved = snapshot.resolve_installed(|_| None);
        assert_eq!(unresolved, vec!["mystery"]);
        assert_eq!(snapshot.dev.get("mystery").unwrap(), "*");
    }

    #[test]
    fn prior_manifest_json_deserializes_into_snapshot() {
        let text = r#"{
            "name": "demo",
            "dependencies": { "foo": "^1.2.0" },
            "devDependencies": { "bar": "*" },
            "scripts": { "build": "projforge run build" }
        }"#;

        let prior: DependencySnapshot = serde_json::from_str(text).unwrap();
        assert_eq!(prior.runtime.get("foo").unwrap(), "^1.2.0");
        assert_eq!(prior.dev.get("bar").unwrap(), "*");
        assert!(prior.peer.is_empty());
    }
}
