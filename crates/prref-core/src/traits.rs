//! Seams between the pure core and its collaborators

use crate::error::Result;
use crate::types::ValidationOutcome;
use std::future::Future;

/// Decides whether a candidate string is an acceptable reference
pub trait RefClassifier {
    /// Classify one candidate; must be pure and deterministic
    fn classify<'a>(&self, candidate: &'a str) -> ValidationOutcome<'a>;
}

/// The built-in precedence-ordered classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictClassifier;

impl RefClassifier for StrictClassifier {
    #[inline]
    fn classify<'a>(&self, candidate: &'a str) -> ValidationOutcome<'a> {
        crate::refs::classify(candidate)
    }
}

/// Supplies the free-form text references are extracted from
pub trait TextSource {
    /// Fetch the text. Missing text is `Ok("")`; failing to reach the source
    /// is an error.
    fn fetch_text(&self) -> impl Future<Output = Result<String>> + Send;
}
