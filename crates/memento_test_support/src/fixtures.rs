//! Documents and trees shared by the codec tests, benches and fuzz seeds.
use memento::{Memento, Uuid};

/// The `config`/`user` document that [`config_tree`] builds.
pub const CONFIG_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<config version="2">
    <user name="ada" admin="true" ratio="0.75"/>
    <user name="bob" admin="false" ratio="1.5"/>
</config>
"#;

pub const GUID_DOCUMENT: &str = r#"<item id="{3FA85F64-5717-4562-B3FC-2C963F66AFA6}" count="abc"/>"#;

/// The canonical form of the id in [`GUID_DOCUMENT`].
pub const GUID_CANONICAL: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

/// Exercises everything the parser skips or rewrites.
pub const PROLOG_DOCUMENT: &str = "<?xml version=\"1.0\"?>\r\n\
<!DOCTYPE settings [\r\n  <!ELEMENT settings ANY>\r\n]>\r\n\
<!-- generated -->\r\n\
<settings path=\"C:\\data\" note=\"a&amp;b&#10;c\">\r\n\
    <?editor fold?>\r\n\
    <entry><![CDATA[<raw> & kept]]></entry>\r\n\
    <entry>line one\r\nline two</entry>\r\n\
</settings>\r\n";

/// Inputs every XML codec must reject, with a label for assertion messages.
pub const MALFORMED_DOCUMENTS: &[(&str, &str)] = &[
    ("empty", ""),
    ("only comment", "<!-- nothing -->"),
    ("unclosed root", "<a><b/>"),
    ("mismatched end", "<a><b></a></b>"),
    ("stray end", "<a/></a>"),
    ("two roots", "<a/><b/>"),
    ("text before root", "hello<a/>"),
    ("unterminated tag", "<a x=\"1\""),
    ("unterminated comment", "<a><!-- </a>"),
    ("unterminated cdata", "<a><![CDATA[x</a>"),
    ("missing equals", "<a x/>"),
    ("unquoted value", "<a x=1/>"),
    ("lt in value", "<a x=\"<\"/>"),
    ("duplicate attribute", "<a x=\"1\" x=\"2\"/>"),
    ("bad name", "<1a/>"),
    ("doctype inside root", "<a><!DOCTYPE a></a>"),
    ("cdata end in text", "<a>]]></a>"),
];

/// The tree [`CONFIG_DOCUMENT`] describes.
pub fn config_tree() -> Memento {
    let root = Memento::new_root("config");
    root.put_integer("version", 2);
    for (name, admin, ratio) in [("ada", true, 0.75), ("bob", false, 1.5)] {
        let user = root.create_child("user");
        user.put_string("name", name);
        user.put_boolean("admin", admin);
        user.put_double("ratio", ratio);
    }
    root
}

/// A tree touching every value type plus text in awkward places.
pub fn mixed_tree() -> Memento {
    let root = Memento::new_root("state");
    root.put_guid("session", Uuid::from_u128(0x3fa85f64_5717_4562_b3fc_2c963f66afa6));
    root.put_string("quote", "say \"hi\" & <bye>\t\r\n");
    root.put_double("nan", f64::NAN);
    root.put_integer("min", i32::MIN);

    let window = root.create_child_with_id("window", "main");
    window.put_boolean("visible", true);
    window.create_child("pane").put_text_data("  padded  ");
    window.create_child("empty").put_text_data("");

    let notes = root.create_child("notes");
    notes.put_text_data("first\r\nsecond ☃");
    notes.create_child("note").put_text_data("<tagged> & escaped");
    notes.create_child("note");

    let spaced = root.create_child("spaced");
    spaced.put_text_data(" \t\n");
    spaced.create_child("inner");

    let hollow = root.create_child("hollow");
    hollow.put_text_data("");
    hollow.create_child("inner");
    root
}

/// `<n>` nested `depth` levels deep.
pub fn deep_document(depth: usize) -> String {
    format!("{}{}", "<n>".repeat(depth), "</n>".repeat(depth))
}

/// A root with `count` attribute-carrying children.
pub fn wide_tree(count: usize) -> Memento {
    let root = Memento::new_root("items");
    for i in 0..count {
        let item = root.create_child("item");
        item.put_integer("index", i32::try_from(i).unwrap_or(i32::MAX));
        item.put_string("label", &format!("item {i} & co"));
        if i % 3 == 0 {
            item.put_text_data("some text");
        }
    }
    root
}
