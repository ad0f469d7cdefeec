#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let doc = archie::parse_str(s, &archie::Options::default());
        assert!(doc.is_object());
    }
});
