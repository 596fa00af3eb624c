//! Semantic version ranges and minimum-version resolution.
//!
//! # Design
//!
//! A [`VersionSpec`] is a parsed, pure value type: no I/O, no registry
//! lookups. The only resolution this module performs is *minimum of a
//! range*, which is what peer pinning needs. Anything that consults real
//! installed state lives behind the registry port, not here.
//!
//! Supported range shapes are the ones that appear in package manifests in
//! practice: `*`, `^x.y.z`, `~x.y.z`, `>=x.y.z`, and exact versions.
//! Components may be partial (`^16` is `^16.0.0`).

use std::fmt;

use crate::domain::error::DomainError;

/// A parsed version range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    /// `*`: any version.
    Any,
    /// `^x.y.z`: compatible within the same major version.
    Caret(VersionCore),
    /// `~x.y.z`: compatible within the same minor version.
    Tilde(VersionCore),
    /// `>=x.y.z`: at least the given version.
    AtLeast(VersionCore),
    /// `x.y.z`: exactly the given version.
    Exact(VersionCore),
}

/// The numeric dotted part of a version, e.g. `16.2.0`.
///
/// Missing components are treated as zero when rendered, so `^16` has the
/// minimum `16.0.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCore {
    parts: Vec<u64>,
}

impl VersionCore {
    fn parse(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        let parts = text
            .split('.')
            .map(|p| p.trim().parse::<u64>().ok())
            .collect::<Option<Vec<u64>>>()?;
        Some(Self { parts })
    }

    /// Render as a full `major.minor.patch` triple, zero-padding missing
    /// components.
    pub fn padded(&self) -> String {
        let get = |i: usize| self.parts.get(i).copied().unwrap_or(0);
        format!("{}.{}.{}", get(0), get(1), get(2))
    }
}

impl VersionSpec {
    /// Parse a version range string.
    ///
    /// Fails with [`DomainError::UnresolvableRange`] on an empty or
    /// malformed range; `name` is only used for error reporting.
    pub fn parse(name: &str, range: &str) -> Result<Self, DomainError> {
        let unresolvable = |reason: &str| DomainError::UnresolvableRange {
            name: name.to_string(),
            range: range.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = range.trim().trim_start_matches('v');
        if trimmed.is_empty() {
            return Err(unresolvable("range is empty"));
        }
        if trimmed == "*" {
            return Ok(Self::Any);
        }

        if let Some(rest) = trimmed.strip_prefix('^') {
            let core = VersionCore::parse(rest.trim().trim_start_matches('v'))
                .ok_or_else(|| unresolvable("not a numeric version after '^'"))?;
            return Ok(Self::Caret(core));
        }
        if let Some(rest) = trimmed.strip_prefix('~') {
            let core = VersionCore::parse(rest.trim().trim_start_matches('v'))
                .ok_or_else(|| unresolvable("not a numeric version after '~'"))?;
            return Ok(Self::Tilde(core));
        }
        if let Some(rest) = trimmed.strip_prefix(">=") {
            let core = VersionCore::parse(rest.trim().trim_start_matches('v'))
                .ok_or_else(|| unresolvable("not a numeric version after '>='"))?;
            return Ok(Self::AtLeast(core));
        }

        let core = VersionCore::parse(trimmed)
            .ok_or_else(|| unresolvable("not a recognized version range"))?;
        Ok(Self::Exact(core))
    }

    /// The minimum concrete version satisfying this range.
    ///
    /// `*` is treated as `>=0.0.0`, so its minimum is `0.0.0`. For the
    /// prefix ranges the minimum is the (zero-padded) base version itself.
    pub fn minimum(&self) -> String {
        match self {
            Self::Any => "0.0.0".to_string(),
            Self::Caret(core) | Self::Tilde(core) | Self::AtLeast(core) | Self::Exact(core) => {
                core.padded()
            }
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Caret(core) => write!(f, "^{}", core.padded()),
            Self::Tilde(core) => write!(f, "~{}", core.padded()),
            Self::AtLeast(core) => write!(f, ">={}", core.padded()),
            Self::Exact(core) => f.write_str(&core.padded()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_minimum_pads_partial_versions() {
        let spec = VersionSpec::parse("react", "^16").unwrap();
        assert_eq!(spec.minimum(), "16.0.0");
    }

    #[test]
    fn tilde_and_gte_minimums() {
        assert_eq!(VersionSpec::parse("a", "~1.2").unwrap().minimum(), "1.2.0");
        assert_eq!(
            VersionSpec::parse("a", ">=3.1.4").unwrap().minimum(),
            "3.1.4"
        );
    }

    #[test]
    fn exact_minimum_is_itself() {
        assert_eq!(
            VersionSpec::parse("a", "2.0.1").unwrap().minimum(),
            "2.0.1"
        );
    }

    #[test]
    fn wildcard_minimum_is_zero() {
        assert_eq!(VersionSpec::parse("a", "*").unwrap().minimum(), "0.0.0");
    }

    #[test]
    fn empty_range_is_unresolvable() {
        let err = VersionSpec::parse("foo", "").unwrap_err();
        assert!(matches!(err, DomainError::UnresolvableRange { .. }));
    }

    #[test]
    fn malformed_range_is_unresolvable() {
        assert!(VersionSpec::parse("foo", "^banana").is_err());
        assert!(VersionSpec::parse("foo", "not-a-version").is_err());
        assert!(VersionSpec::parse("foo", "^").is_err());
    }

    #[test]
    fn leading_v_is_tolerated() {
        assert_eq!(
            VersionSpec::parse("a", "v1.2.3").unwrap().minimum(),
            "1.2.3"
        );
        assert_eq!(
            VersionSpec::parse("a", "^v2.0").unwrap().minimum(),
            "2.0.0"
        );
    }

    #[test]
    fn display_round_trips_shape() {
        assert_eq!(
            VersionSpec::parse("a", "^16").unwrap().to_string(),
            "^16.0.0"
        );
        assert_eq!(VersionSpec::parse("a", "*").unwrap().to_string(), "*");
    }
}
