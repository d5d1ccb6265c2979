#![no_main]

use libfuzzer_sys::fuzz_target;
use memento::tree_snapshot::{TreeSnapshotOptions, compare_trees};
use memento::{NormalizeMode, TreeCodec};
use xml::XmlCodec;

// Whatever parses must render, and the rendering must parse back to the
// same tree.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let codec = XmlCodec::default();
    let Ok(tree) = codec.parse_text(text) else {
        return;
    };
    for mode in [NormalizeMode::None, NormalizeMode::Utf8, NormalizeMode::Utf16] {
        let bytes = codec.render(&tree, mode).expect("parsed tree renders");
        let reparsed = codec.parse(&bytes).expect("rendered tree parses");
        if let Err(mismatch) = compare_trees(&tree, &reparsed, TreeSnapshotOptions::default()) {
            panic!("{mismatch}");
        }
    }
});
