#![no_main]
use libfuzzer_sys::fuzz_target;
use prref_core::{resolve, TargetRegistry};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let registry = TargetRegistry::builtin();
        // On success every target gets exactly one entry
        if let Ok(set) = resolve(text, &registry) {
            assert_eq!(set.len(), registry.len());
        }
    }
});
