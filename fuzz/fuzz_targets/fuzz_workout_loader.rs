#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use workout_clock::config::ConfigLoader;

fuzz_target!(|data: &[u8]| {
    if let Ok(yaml_str) = std::str::from_utf8(data) {
        let loader = ConfigLoader::with_defaults();
        // Any outcome is fine as long as the loader does not panic.
        let _ = loader.load_str(yaml_str, Path::new("fuzz.yaml"));
    }
});
