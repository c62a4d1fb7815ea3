//! Reference classification: commit hash, SemVer tag, or branch/tag name
//!
//! Rules are applied in strict precedence order and the first rule that
//! matches decides the outcome:
//!
//! 1. length guard (`TooLong`)
//! 2. commit hash shape
//! 3. SemVer tag
//! 4. generic branch/tag grammar, with a version-lookalike guard
//!    (`MalformedVersionLike`)
//! 5. anything else (`InvalidFormat`)
//!
//! Accepted references are returned unchanged; the classifier never rewrites
//! its input.

use crate::error::RejectReason;
use crate::types::{RefKind, ValidationOutcome};
use once_cell::sync::Lazy;
use regex::Regex;

/// Longest accepted reference, in UTF-16 code units
pub const MAX_REF_LEN: usize = 255;

static COMMIT_HASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{4,40}$").expect("valid regex"));

// semver.org grammar with an optional `v` prefix. ASCII classes only: `\d`
// would admit non-ASCII digits.
static SEMVER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^[vV]?(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)",
        r"(?:-((?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*)",
        r"(?:\.(?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*))*))?",
        r"(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
    ))
    .expect("valid regex")
});

static BRANCH_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9._/-]*[A-Za-z0-9])?$").expect("valid regex")
});

static VERSION_LIKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[vV]?[0-9]+\.[0-9]+").expect("valid regex"));

/// Sequences git refuses in ref names (see `git check-ref-format`)
const FORBIDDEN_SEQUENCES: [&str; 4] = ["..", "//", "@{", "/."];

/// Characters with special meaning to git revision syntax or shells
const FORBIDDEN_CHARS: [char; 8] = [' ', '~', '^', ':', '?', '*', '[', '\\'];

/// Classify one candidate reference.
///
/// Pure and deterministic: the same input always yields the same outcome.
///
/// # Example
///
/// ```
/// use prref_core::refs::classify;
/// use prref_core::{RefKind, RejectReason, ValidationOutcome};
///
/// assert_eq!(
///     classify("v1.2.3"),
///     ValidationOutcome::Accepted { reference: "v1.2.3", kind: RefKind::SemVerTag }
/// );
/// assert_eq!(
///     classify("v1.02.0"),
///     ValidationOutcome::Rejected(RejectReason::MalformedVersionLike)
/// );
/// ```
pub fn classify(candidate: &str) -> ValidationOutcome<'_> {
    if exceeds_max_len(candidate) {
        return ValidationOutcome::Rejected(RejectReason::TooLong);
    }

    if is_commit_hash(candidate) {
        return accept(candidate, RefKind::CommitHash);
    }

    if is_semver(candidate) {
        return accept(candidate, RefKind::SemVerTag);
    }

    if is_safe_ref_name(candidate) {
        if VERSION_LIKE.is_match(candidate) {
            return ValidationOutcome::Rejected(RejectReason::MalformedVersionLike);
        }
        return accept(candidate, RefKind::BranchOrTag);
    }

    ValidationOutcome::Rejected(RejectReason::InvalidFormat)
}

#[inline]
fn accept(reference: &str, kind: RefKind) -> ValidationOutcome<'_> {
    ValidationOutcome::Accepted { reference, kind }
}

#[inline]
fn exceeds_max_len(candidate: &str) -> bool {
    // Cheap byte bound first: UTF-16 length never exceeds UTF-8 length
    candidate.len() > MAX_REF_LEN && candidate.encode_utf16().count() > MAX_REF_LEN
}

/// True for 4 to 40 hex characters, either case
#[inline]
pub fn is_commit_hash(candidate: &str) -> bool {
    COMMIT_HASH.is_match(candidate)
}

/// True for a strict SemVer version with optional `v` prefix
#[inline]
pub fn is_semver(candidate: &str) -> bool {
    SEMVER.is_match(candidate)
}

/// Generic branch/tag grammar.
///
/// Every check runs for every candidate that reaches this rule; none of them
/// sits behind an earlier early return.
pub fn is_safe_ref_name(candidate: &str) -> bool {
    let no_forbidden_chars = !candidate.contains(FORBIDDEN_CHARS);
    let no_forbidden_sequences = FORBIDDEN_SEQUENCES
        .iter()
        .all(|seq| !candidate.contains(seq));
    let no_dot_edges = !candidate.starts_with('.') && !candidate.ends_with('.');
    let no_lock_suffix = !candidate.ends_with(".lock");

    no_forbidden_chars
        && no_forbidden_sequences
        && no_dot_edges
        && no_lock_suffix
        && BRANCH_SHAPE.is_match(candidate)
}
