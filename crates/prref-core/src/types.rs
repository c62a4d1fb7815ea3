//! Core type definitions

use crate::error::RejectReason;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Which kind of git reference a candidate was recognised as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RefKind {
    /// 4 to 40 hex characters
    CommitHash,
    /// `MAJOR.MINOR.PATCH` with optional `v`, pre-release and build metadata
    SemVerTag,
    /// Any other safe branch or tag name
    BranchOrTag,
}

impl RefKind {
    /// Get string representation
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CommitHash => "commit",
            Self::SemVerTag => "semver",
            Self::BranchOrTag => "branch",
        }
    }
}

/// Classifier verdict for a single candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome<'a> {
    /// The candidate is safe to use as-is
    Accepted {
        /// The reference, unchanged from the candidate
        reference: &'a str,
        /// What it was recognised as
        kind: RefKind,
    },
    /// The candidate must not be used
    Rejected(RejectReason),
}

impl ValidationOutcome<'_> {
    /// True for `Accepted`
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Where a resolved reference came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefOrigin {
    /// Found in the text and accepted by the classifier
    Explicit(RefKind),
    /// Target was not mentioned (or the text was empty)
    Default,
}

impl RefOrigin {
    /// Get string representation
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Explicit(kind) => kind.as_str(),
            Self::Default => "default",
        }
    }
}

/// Raw candidates pulled out of the text, one slot per target in registry order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult<'t> {
    pub(crate) entries: Vec<(&'t str, Option<&'t str>)>,
}

impl<'t> ExtractionResult<'t> {
    /// Candidate for a target (`None` if absent or the target is unknown)
    pub fn get(&self, target: &str) -> Option<&'t str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == target)
            .and_then(|(_, candidate)| *candidate)
    }

    /// Iterate `(target, candidate)` in registry order
    pub fn iter(&self) -> impl Iterator<Item = (&'t str, Option<&'t str>)> + '_ {
        self.entries.iter().copied()
    }

    /// Names of targets that had an explicit candidate
    pub fn found(&self) -> impl Iterator<Item = &'t str> + '_ {
        self.entries
            .iter()
            .filter(|(_, candidate)| candidate.is_some())
            .map(|(name, _)| *name)
    }

    /// Number of targets (present or absent)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the registry had no targets
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Final reference for one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRef {
    /// Target name
    pub target: String,
    /// Output key the reference is published under
    pub output_key: String,
    /// The validated candidate or the target default
    pub reference: String,
    /// Explicit or default
    pub origin: RefOrigin,
}

/// Terminal artifact: exactly one reference per registry target, in registry order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedRefSet {
    pub(crate) refs: Vec<ResolvedRef>,
}

impl ResolvedRefSet {
    /// Reference for a target name
    pub fn get(&self, target: &str) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.target == target)
            .map(|r| r.reference.as_str())
    }

    /// Reference for an output key
    pub fn get_output(&self, output_key: &str) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.output_key == output_key)
            .map(|r| r.reference.as_str())
    }

    /// Iterate entries in registry order
    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedRef> {
        self.refs.iter()
    }

    /// `(output_key, reference)` pairs in registry order
    pub fn outputs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.refs
            .iter()
            .map(|r| (r.output_key.as_str(), r.reference.as_str()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// True when the registry had no targets
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

impl<'a> IntoIterator for &'a ResolvedRefSet {
    type Item = &'a ResolvedRef;
    type IntoIter = std::slice::Iter<'a, ResolvedRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.refs.iter()
    }
}

/// Serializes as `{output_key: reference}` preserving registry order
impl Serialize for ResolvedRefSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.refs.len()))?;
        for (key, reference) in self.outputs() {
            map.serialize_entry(key, reference)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResolvedRefSet {
        ResolvedRefSet {
            refs: vec![
                ResolvedRef {
                    target: "zeta".into(),
                    output_key: "zeta_ref".into(),
                    reference: "abc1234".into(),
                    origin: RefOrigin::Explicit(RefKind::CommitHash),
                },
                ResolvedRef {
                    target: "alpha".into(),
                    output_key: "alpha_ref".into(),
                    reference: "develop".into(),
                    origin: RefOrigin::Default,
                },
            ],
        }
    }

    #[test]
    fn test_lookup_by_target_and_output() {
        let set = sample();
        assert_eq!(set.get("zeta"), Some("abc1234"));
        assert_eq!(set.get_output("alpha_ref"), Some("develop"));
        assert_eq!(set.get("missing"), None);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_serialize_preserves_registry_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"zeta_ref":"abc1234","alpha_ref":"develop"}"#);
    }

    #[test]
    fn test_origin_strings() {
        assert_eq!(RefOrigin::Default.as_str(), "default");
        assert_eq!(RefOrigin::Explicit(RefKind::SemVerTag).as_str(), "semver");
    }

    #[test]
    fn test_extraction_result_found() {
        let result = ExtractionResult {
            entries: vec![("core", Some("main")), ("sdk", None)],
        };
        assert_eq!(result.found().collect::<Vec<_>>(), vec!["core"]);
        assert_eq!(result.get("core"), Some("main"));
        assert_eq!(result.get("sdk"), None);
    }
}
