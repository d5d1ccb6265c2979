use memento::tree_snapshot::{TreeSnapshotOptions, assert_tree_eq};
use memento::{
    EncodeError, LoadError, Memento, NormalizeMode, ParseErrorKind, SaveError, TreeCodec,
};
use memento_test_support::fixtures::{MALFORMED_DOCUMENTS, config_tree, deep_document};
use std::fs;
use xml::{XmlCodec, XmlConfig, XmlMemento};

#[test]
fn malformed_documents_are_rejected() {
    for (label, input) in MALFORMED_DOCUMENTS {
        let err = match XmlMemento::load_from_str(input) {
            Ok(root) => panic!("{label}: expected an error, got root {root:?}"),
            Err(err) => err,
        };
        assert!(
            err.offset <= input.len(),
            "{label}: offset {} past end of input",
            err.offset
        );
    }
}

#[test]
fn error_offsets_locate_the_problem() {
    let input = "<config>\n    <user name=\"ada\">\n</config>";
    let err = XmlMemento::load_from_str(input).expect_err("mismatched end tag");
    assert_eq!(err.offset, input.find("</config>").unwrap());
    assert_eq!(
        err.to_string(),
        format!(
            "end tag `config` does not match open element `user` at byte {}",
            err.offset
        )
    );
}

#[test]
fn undecodable_bytes_are_parse_errors() {
    let err = XmlMemento::load_from_bytes(b"<a x=\"\xFF\"/>").expect_err("invalid utf-8");
    assert!(matches!(err.kind, ParseErrorKind::Decode(_)));
    assert_eq!(err.offset, 6);

    let err = XmlMemento::load_from_bytes(&[0xFF, 0xFE, b'<']).expect_err("odd utf-16");
    assert!(matches!(err.kind, ParseErrorKind::Decode(_)));
}

#[test]
fn nesting_limit_comes_from_config() {
    let codec = XmlCodec::new(XmlConfig {
        max_depth: 8,
        ..XmlConfig::default()
    });
    assert!(codec.parse_text(&deep_document(8)).is_ok());
    let err = codec
        .parse_text(&deep_document(9))
        .expect_err("nine levels");
    assert_eq!(err.kind, ParseErrorKind::TooDeep(8));

    let err = XmlMemento::load_from_str(&deep_document(1025)).expect_err("default limit");
    assert_eq!(err.kind, ParseErrorKind::TooDeep(1024));
}

fn chain(depth: usize) -> Memento {
    let root = Memento::new_root("n");
    let mut node = root.clone();
    for _ in 1..depth {
        node = node.create_child("n");
    }
    root
}

#[test]
fn trees_the_parser_would_refuse_are_not_saved() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("deep.xml");

    let err = XmlMemento::save_to_file(&chain(1025), &path, NormalizeMode::Utf8)
        .expect_err("one level too deep");
    assert!(matches!(err, SaveError::Encode(EncodeError::TooDeep(1024))));
    assert!(!path.exists());

    let deepest = chain(1024);
    XmlMemento::save_to_file(&deepest, &path, NormalizeMode::Utf8).expect("at the limit");
    let loaded = XmlMemento::load_from_file(&path).expect("load");
    assert_tree_eq(&deepest, &loaded, TreeSnapshotOptions::default());

    let codec = XmlCodec::new(XmlConfig {
        max_depth: 4,
        ..XmlConfig::default()
    });
    assert_eq!(
        codec.render_text(&chain(5), NormalizeMode::Utf8),
        Err(EncodeError::TooDeep(4))
    );
}

#[test]
fn load_errors_distinguish_io_from_parse() {
    let dir = tempfile::tempdir().expect("tempdir");

    let missing = dir.path().join("missing.xml");
    assert!(matches!(
        XmlMemento::load_from_file(&missing),
        Err(LoadError::Io { path, .. }) if path == missing
    ));

    let broken = dir.path().join("broken.xml");
    fs::write(&broken, "<a><b></a>").expect("write fixture");
    assert!(matches!(
        XmlMemento::load_from_file(&broken),
        Err(LoadError::Parse(err)) if matches!(err.kind, ParseErrorKind::MismatchedEndTag { .. })
    ));
}

#[test]
fn reader_failures_are_stream_errors() {
    struct Broken;
    impl std::io::Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("device gone"))
        }
    }
    assert!(matches!(
        XmlCodec::default().parse_reader(Broken),
        Err(LoadError::Stream(_))
    ));
    let root = XmlCodec::default()
        .parse_reader(&b"<a/>"[..])
        .expect("slice reader");
    assert_eq!(root.name(), "a");
}

#[test]
fn unencodable_trees_fail_without_touching_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("state.xml");
    XmlMemento::save_to_file(&config_tree(), &path, NormalizeMode::Utf8).expect("first save");
    let before = fs::read(&path).expect("read back");

    let bad = Memento::new_root("not a name");
    assert!(matches!(
        XmlMemento::save_to_file(&bad, &path, NormalizeMode::Utf8),
        Err(SaveError::Encode(_))
    ));
    let bad = Memento::new_root("ok");
    bad.put_string("v", "bell\u{7}");
    assert!(matches!(
        XmlMemento::save_to_file(&bad, &path, NormalizeMode::Utf16),
        Err(SaveError::Encode(_))
    ));

    assert_eq!(fs::read(&path).expect("read back"), before);
}

#[test]
fn save_into_missing_directory_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("no-such-dir").join("state.xml");
    assert!(matches!(
        XmlMemento::save_to_file(&config_tree(), &path, NormalizeMode::Utf8),
        Err(SaveError::Io { .. })
    ));
}

#[test]
fn failed_load_leaves_existing_tree_alone() {
    let root = config_tree();
    let before = XmlMemento::save_to_string(&root, NormalizeMode::Utf8).expect("save");
    assert!(XmlMemento::load_from_str("<config><user></config>").is_err());
    assert_eq!(
        XmlMemento::save_to_string(&root, NormalizeMode::Utf8).expect("save"),
        before
    );
}
