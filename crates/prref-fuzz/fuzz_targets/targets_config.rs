#![no_main]
use libfuzzer_sys::fuzz_target;
use prref_core::TargetRegistry;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Fuzz YAML target loading
        let _ = TargetRegistry::from_yaml_str(s);
    }
});
