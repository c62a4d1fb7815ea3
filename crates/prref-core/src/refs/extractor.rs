//! Candidate extraction from free-form text

use crate::registry::TargetRegistry;
use crate::types::ExtractionResult;

/// Pull at most one raw candidate per target out of `text`.
///
/// Each target pattern runs once (first match only). Captured text is passed
/// through untouched: no trimming, unquoting, or decoding.
pub fn extract<'t>(text: &'t str, registry: &'t TargetRegistry) -> ExtractionResult<'t> {
    let entries = registry
        .iter()
        .map(|spec| {
            let candidate = spec
                .pattern()
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str());
            (spec.name(), candidate)
        })
        .collect();

    ExtractionResult { entries }
}
