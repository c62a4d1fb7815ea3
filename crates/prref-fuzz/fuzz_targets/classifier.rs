#![no_main]
use libfuzzer_sys::fuzz_target;
use prref_core::refs::classify;
use prref_core::ValidationOutcome;

const UNSAFE: [&str; 12] = ["..", "//", "@{", "/.", " ", "~", "^", ":", "?", "*", "[", "\\"];

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Anything accepted must be returned unchanged and be free of git-unsafe text
        if let ValidationOutcome::Accepted { reference, .. } = classify(s) {
            assert_eq!(reference, s);
            assert!(s.len() <= 255);
            assert!(!s.ends_with(".lock"));
            for seq in UNSAFE {
                assert!(!s.contains(seq), "accepted {:?} containing {:?}", s, seq);
            }
        }
        // Deterministic
        assert_eq!(classify(s), classify(s));
    }
});
