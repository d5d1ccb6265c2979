#![no_main]

use libfuzzer_sys::fuzz_target;
use memento::TreeCodec;
use xml::{XmlCodec, XmlConfig};

// Arbitrary bytes must yield a tree or an error, never a panic. Offsets of
// errors in UTF-8 text must stay inside the text.
fuzz_target!(|data: &[u8]| {
    let codec = XmlCodec::new(XmlConfig {
        max_depth: 256,
        ..XmlConfig::default()
    });
    let _ = codec.parse(data);
    if let Ok(text) = std::str::from_utf8(data)
        && let Err(err) = codec.parse_text(text)
    {
        assert!(err.offset <= text.len(), "offset {} past input end", err.offset);
    }
});
