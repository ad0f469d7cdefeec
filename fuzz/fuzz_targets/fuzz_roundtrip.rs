#![no_main]
use libfuzzer_sys::fuzz_target;

// Whatever the parser produces and the encoder accepts must parse back
// to the same document.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let opts = archie::Options::default();
        let doc = archie::parse_str(s, &opts);
        if let Ok(text) = archie::encode_value_to_string(&doc, &opts) {
            let again = archie::parse_str(&text, &opts);
            assert_eq!(again, doc, "encoded:\n{text}");
        }
    }
});
