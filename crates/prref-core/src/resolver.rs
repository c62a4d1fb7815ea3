//! Resolution: extract, classify, fall back to defaults

use crate::error::{Error, Result};
use crate::refs::extract;
use crate::registry::TargetRegistry;
use crate::traits::{RefClassifier, StrictClassifier};
use crate::types::{RefOrigin, ResolvedRef, ResolvedRefSet, ValidationOutcome};
use tracing::{debug, info, warn};

/// Resolves one reference per registry target from a block of text
pub struct RefResolver<'a, C = StrictClassifier> {
    registry: &'a TargetRegistry,
    classifier: C,
}

impl<'a> RefResolver<'a, StrictClassifier> {
    /// Create a resolver using the built-in classifier
    pub fn new(registry: &'a TargetRegistry) -> Self {
        Self {
            registry,
            classifier: StrictClassifier,
        }
    }
}

impl<'a, C: RefClassifier> RefResolver<'a, C> {
    /// Create a resolver with a custom classifier
    pub fn with_classifier(registry: &'a TargetRegistry, classifier: C) -> Self {
        Self {
            registry,
            classifier,
        }
    }

    /// Resolve every target.
    ///
    /// Empty or whitespace-only text resolves every target to its default
    /// without classifying anything. Otherwise the first rejected candidate,
    /// in registry order, fails the whole call.
    pub fn resolve(&self, text: &str) -> Result<ResolvedRefSet> {
        info!(text = ?text, "pull request text");

        if text.trim().is_empty() {
            info!("no text provided, using defaults for all targets");
            return Ok(self.defaults());
        }

        let extraction = extract(text, self.registry);
        let found: Vec<&str> = extraction.found().collect();
        info!(targets = ?found, "explicit references found");

        let mut refs = Vec::with_capacity(self.registry.len());

        for (spec, (_, candidate)) in self.registry.iter().zip(extraction.iter()) {
            let resolved = match candidate {
                None => default_ref(spec),
                Some(candidate) => match self.classifier.classify(candidate) {
                    ValidationOutcome::Accepted { reference, kind } => {
                        debug!(target_name = spec.name(), reference, kind = kind.as_str(), "accepted");
                        ResolvedRef {
                            target: spec.name().to_string(),
                            output_key: spec.output_key().to_string(),
                            reference: reference.to_string(),
                            origin: RefOrigin::Explicit(kind),
                        }
                    }
                    ValidationOutcome::Rejected(reason) => {
                        warn!(
                            target_name = spec.name(),
                            candidate,
                            reason = reason.as_str(),
                            "rejected"
                        );
                        return Err(Error::Validation {
                            target: spec.name().to_string(),
                            candidate: candidate.to_string(),
                            reason,
                        });
                    }
                },
            };
            refs.push(resolved);
        }

        let set = ResolvedRefSet { refs };
        log_resolved(&set);
        Ok(set)
    }

    fn defaults(&self) -> ResolvedRefSet {
        let set = ResolvedRefSet {
            refs: self.registry.iter().map(default_ref).collect(),
        };
        log_resolved(&set);
        set
    }
}

fn default_ref(spec: &crate::registry::TargetSpec) -> ResolvedRef {
    ResolvedRef {
        target: spec.name().to_string(),
        output_key: spec.output_key().to_string(),
        reference: spec.default_ref().to_string(),
        origin: RefOrigin::Default,
    }
}

fn log_resolved(set: &ResolvedRefSet) {
    for r in set {
        info!(
            target_name = %r.target,
            reference = %r.reference,
            origin = r.origin.as_str(),
            "resolved"
        );
    }
}

/// Resolve `text` against `registry` with the built-in classifier
pub fn resolve(text: &str, registry: &TargetRegistry) -> Result<ResolvedRefSet> {
    RefResolver::new(registry).resolve(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, RejectReason};
    use crate::registry::TargetSpec;
    use crate::types::RefKind;
    use std::cell::Cell;

    struct CountingClassifier<'c> {
        calls: &'c Cell<usize>,
    }

    impl RefClassifier for CountingClassifier<'_> {
        fn classify<'a>(&self, candidate: &'a str) -> ValidationOutcome<'a> {
            self.calls.set(self.calls.get() + 1);
            crate::refs::classify(candidate)
        }
    }

    fn registry() -> TargetRegistry {
        TargetRegistry::new(vec![
            TargetSpec::builtin("core").unwrap(),
            TargetSpec::builtin("other1").unwrap(),
            TargetSpec::builtin("other2").unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_text_uses_defaults_without_classifying() {
        let registry = registry();
        let calls = Cell::new(0);
        let resolver = RefResolver::with_classifier(&registry, CountingClassifier { calls: &calls });

        for text in ["", "   \n\t  "] {
            let set = resolver.resolve(text).unwrap();
            assert_eq!(set.len(), 3);
            assert!(set.iter().all(|r| r.origin == RefOrigin::Default));
            assert!(set.iter().all(|r| r.reference == "develop"));
        }
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_explicit_and_default_mix() {
        let registry = registry();
        let set = resolve("Bumps things.\n\ncore ref: abc1234\n", &registry).unwrap();

        assert_eq!(set.get("core"), Some("abc1234"));
        assert_eq!(set.get("other1"), Some("develop"));
        assert_eq!(set.get("other2"), Some("develop"));
        assert_eq!(
            set.iter().next().map(|r| r.origin),
            Some(RefOrigin::Explicit(RefKind::CommitHash))
        );
    }

    #[test]
    fn test_only_present_candidates_are_classified() {
        let registry = registry();
        let calls = Cell::new(0);
        let resolver = RefResolver::with_classifier(&registry, CountingClassifier { calls: &calls });
        resolver.resolve("other2 ref: main").unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_fail_fast_stops_at_first_rejection() {
        let registry = registry();
        let calls = Cell::new(0);
        let resolver = RefResolver::with_classifier(&registry, CountingClassifier { calls: &calls });

        let err = resolver
            .resolve("core ref: a..b\nother1 ref: c..d\nother2 ref: main")
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.target(), Some("core"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_failure_follows_registry_order_not_text_order() {
        let registry = registry();
        let err = resolve("other2 ref: bad~1\nother1 ref: v1.02", &registry).unwrap_err();
        match err {
            Error::Validation { target, reason, candidate } => {
                assert_eq!(target, "other1");
                assert_eq!(candidate, "v1.02");
                assert_eq!(reason, RejectReason::MalformedVersionLike);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_resolved_set_has_one_entry_per_target() {
        let registry = registry();
        let set = resolve("core ref: main core ref: dev other1 ref: v2.0.0", &registry).unwrap();
        assert_eq!(set.len(), registry.len());
        assert_eq!(set.get("core"), Some("main"));
        assert_eq!(set.get("other1"), Some("v2.0.0"));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'w> tracing_subscriber::fmt::MakeWriter<'w> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'w self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_logged_text_cannot_start_workflow_command() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let registry = registry();

        tracing::subscriber::with_default(subscriber, || {
            resolve(
                "hello\n::error title=spoof::fake\r\n::stop-commands::token\ncore ref: main",
                &registry,
            )
            .unwrap();
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("pull request text"));
        assert!(output.contains("spoof"));
        assert!(!output.lines().any(|line| line.starts_with("::")));
    }
}
