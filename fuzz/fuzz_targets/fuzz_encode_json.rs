#![no_main]
use libfuzzer_sys::fuzz_target;

// Any JSON document the encoder accepts must come back as an object whose
// top-level keys match the input's.
fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let opts = archie::Options::default();
    if let Ok(text) = archie::encode_to_string(&value, &opts) {
        let parsed = archie::parse_str(&text, &opts).to_json();
        let (Some(input), Some(output)) = (value.as_object(), parsed.as_object()) else {
            panic!("encoded a non-object:\n{text}");
        };
        let want: Vec<&String> = input.keys().collect();
        let got: Vec<&String> = output.keys().collect();
        assert_eq!(want, got, "encoded:\n{text}");
    }
});
