use xml_memento::tree_snapshot::{TreeSnapshotOptions, assert_tree_eq, compare_trees};
use xml_memento::{Memento, NormalizeMode, Uuid, XmlMemento};

fn reload(root: &Memento) -> Memento {
    let text = XmlMemento::save_to_string(root, NormalizeMode::Utf8).expect("save");
    XmlMemento::load_from_str(&text).expect("load")
}

#[test]
fn strings_read_back_exactly() {
    let root = Memento::new_root("r");
    for value in ["", " padded ", "line\nbreak", "quote \" & <tag>", "ünïcødé ☃"] {
        root.put_string("k", value);
        assert_eq!(root.get_string("k").as_deref(), Some(value));
        assert_eq!(reload(&root).get_string("k").as_deref(), Some(value));
    }
}

#[test]
fn typed_values_round_trip() {
    let root = Memento::new_root("r");
    for value in [true, false] {
        root.put_boolean("b", value);
        assert_eq!(root.get_boolean("b"), Some(value));
    }
    for value in [0, -1, i32::MAX, i32::MIN] {
        root.put_integer("i", value);
        assert_eq!(root.get_integer("i"), Some(value));
    }
    for value in [0.1, -0.0, 1e300, f64::MIN_POSITIVE, f64::INFINITY] {
        root.put_double("d", value);
        assert_eq!(root.get_double("d").map(f64::to_bits), Some(value.to_bits()));
    }
    root.put_double("d", f64::NAN);
    assert!(root.get_double("d").is_some_and(f64::is_nan));
}

#[test]
fn guid_spellings_read_as_one_uuid() {
    let root = Memento::new_root("r");
    let expected = Uuid::parse_str("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("uuid");
    for spelling in [
        "{3FA85F64-5717-4562-B3FC-2C963F66AFA6}",
        "3FA85F64-5717-4562-B3FC-2C963F66AFA6",
        "3fa85f64-5717-4562-B3fc-2c963f66afa6",
    ] {
        root.put_string("g", spelling);
        assert_eq!(root.get_guid("g"), Some(expected), "{spelling}");
    }
    root.put_guid("g", expected);
    assert_eq!(
        root.get_string("g").as_deref(),
        Some("3fa85f64-5717-4562-b3fc-2c963f66afa6")
    );
}

#[test]
fn smart_create_reuses_existing_child() {
    let root = Memento::new_root("r");
    let first = root.create_child_smart("settings");
    let second = root.create_child_smart("settings");
    assert_eq!(first, second);
    assert_eq!(root.children("settings").len(), 1);
}

#[test]
fn lookups_without_matches_are_empty() {
    let root = Memento::new_root("r");
    assert_eq!(root.child("x"), None);
    assert!(root.children("x").is_empty());
    root.create_child("y");
    assert_eq!(root.child("x"), None);
    assert!(root.children("x").is_empty());
    assert_eq!(root.child_from_path("y/x"), None);
    assert!(root.children_from_path("x/y").is_empty());
}

#[test]
fn paths_resolve_relative_to_the_node() {
    let root = XmlMemento::load_from_str(
        "<r><a><b n=\"1\"/><b n=\"2\"/></a><a><b n=\"3\"/></a></r>",
    )
    .expect("load");
    let first_b = root.child_from_path("a/b").expect("a/b");
    assert_eq!(first_b.get_integer("n"), Some(1));
    let numbers: Vec<_> = root
        .children_from_path("/a//b/")
        .iter()
        .filter_map(|b| b.get_integer("n"))
        .collect();
    assert_eq!(numbers, [1, 2]);
    assert_eq!(root.child_from_path(""), Some(root.clone()));
}

#[test]
fn detach_unlinks_from_parent() {
    let root = Memento::new_root("r");
    let child = root.create_child("c");
    child.create_child("grandchild");
    child.detach();

    assert!(child.is_root());
    assert_eq!(child.parent(), None);
    assert!(root.children("c").is_empty());
    assert_eq!(child.child("grandchild").map(|g| g.root()), Some(child.clone()));
    assert!(!XmlMemento::save_to_string(&root, NormalizeMode::Utf8)
        .expect("save")
        .contains("grandchild"));
}

#[test]
fn copy_child_is_deep_and_independent() {
    let source = XmlMemento::load_from_str("<src k=\"v\"><leaf>text</leaf></src>").expect("load");
    let target = Memento::new_root("dst");
    let copy = target.copy_child(&source);

    assert_tree_eq(&source, &copy, TreeSnapshotOptions::default());
    assert_eq!(copy.parent(), Some(target.clone()));

    copy.put_string("k", "changed");
    assert_eq!(source.get_string("k").as_deref(), Some("v"));
    assert!(compare_trees(&source, &copy, TreeSnapshotOptions::default()).is_err());
}

#[test]
fn handles_alias_the_same_node() {
    let root = Memento::new_root("r");
    root.create_child("c");
    let a = root.child("c").expect("c");
    let b = root.children("c").remove(0);
    a.put_text_data("shared");
    assert_eq!(b.text_data().as_deref(), Some("shared"));
}

#[test]
fn built_trees_survive_persistence() {
    let root = Memento::new_root("workspace");
    root.put_guid("id", Uuid::from_u128(42));
    let editors = root.create_child("editors");
    for (i, name) in ["main.rs", "lib.rs", "a & b.rs"].into_iter().enumerate() {
        let editor = editors.create_child_with_id("editor", name);
        editor.put_integer("order", i as i32);
        editor.put_boolean("pinned", i == 0);
    }
    root.create_child("notes").put_text_data("remember\tthis\n");
    root.create_child("blank").put_text_data("");

    assert_tree_eq(&root, &reload(&root), TreeSnapshotOptions::default());
}
