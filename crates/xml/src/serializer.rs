//! Renders a memento subtree as an XML document.
//!
//! Rendering walks the tree with an explicit stack, so deep trees cannot
//! overflow the call stack.
use crate::XmlConfig;
use crate::entities::{escape_all, escape_attribute, escape_text};
use crate::names::is_valid_name;
use core_types::NormalizeMode;
use memento::{EncodeError, Memento};

enum Frame {
    Visit {
        node: Memento,
        depth: usize,
        /// Whether this element starts on its own indented line.
        pretty: bool,
    },
    Close {
        name: String,
        depth: usize,
        pretty: bool,
        /// Whether the children were laid out on their own lines.
        inner_pretty: bool,
    },
}

fn is_whitespace_only(text: &str) -> bool {
    text.chars().all(|ch| matches!(ch, ' ' | '\t' | '\n' | '\r'))
}

fn checked_name(name: String) -> Result<String, EncodeError> {
    if is_valid_name(&name) {
        Ok(name)
    } else {
        Err(EncodeError::InvalidName(name))
    }
}

/// Pretty output stops indenting further past this many levels.
const MAX_INDENT_LEVELS: usize = 32;

fn push_indent(out: &mut String, indent: &str, depth: usize) {
    for _ in 0..depth.min(MAX_INDENT_LEVELS) {
        out.push_str(indent);
    }
}

/// Render the subtree at `root` as a complete document.
///
/// Elements without text are laid out one per line when `config.indent` is
/// set. An element with text is written compactly, text first, so re-parsing
/// yields exactly the same text. Trees nested deeper than `config.max_depth`
/// are refused, since the result could not be read back.
pub fn render(root: &Memento, config: &XmlConfig, mode: NormalizeMode) -> Result<String, EncodeError> {
    let mut out = String::new();
    let indent = config.indent.as_deref();

    if config.xml_declaration {
        match mode.declared_encoding() {
            Some(encoding) => {
                out.push_str(r#"<?xml version="1.0" encoding=""#);
                out.push_str(encoding);
                out.push_str(r#""?>"#);
            }
            None => out.push_str(r#"<?xml version="1.0"?>"#),
        }
        if indent.is_some() {
            out.push('\n');
        }
    }

    let mut node_count = 0usize;
    let mut stack = vec![Frame::Visit {
        node: root.clone(),
        depth: 0,
        pretty: indent.is_some(),
    }];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Visit {
                node,
                depth,
                pretty,
            } => {
                if depth >= config.max_depth {
                    return Err(EncodeError::TooDeep(config.max_depth));
                }
                node_count += 1;
                let name = checked_name(node.name())?;
                if let (true, Some(indent)) = (pretty, indent) {
                    push_indent(&mut out, indent, depth);
                }
                out.push('<');
                out.push_str(&name);
                for (key, value) in node.attributes() {
                    let key = checked_name(key)?;
                    out.push(' ');
                    out.push_str(&key);
                    out.push_str("=\"");
                    escape_attribute(&mut out, &value)?;
                    out.push('"');
                }

                let text = node.text_data();
                let children = node.all_children();
                if text.is_none() && children.is_empty() {
                    out.push_str("/>");
                    if pretty {
                        out.push('\n');
                    }
                    continue;
                }

                out.push('>');
                let inner_pretty = pretty && text.is_none();
                match text {
                    Some(text) if !children.is_empty() && text.is_empty() => {
                        out.push_str("<![CDATA[]]>");
                    }
                    Some(text) if !children.is_empty() && is_whitespace_only(&text) => {
                        escape_all(&mut out, &text)?;
                    }
                    Some(text) => escape_text(&mut out, &text)?,
                    None if inner_pretty => out.push('\n'),
                    None => {}
                }

                stack.push(Frame::Close {
                    name,
                    depth,
                    pretty,
                    inner_pretty,
                });
                stack.extend(children.into_iter().rev().map(|child| Frame::Visit {
                    node: child,
                    depth: depth + 1,
                    pretty: inner_pretty,
                }));
            }
            Frame::Close {
                name,
                depth,
                pretty,
                inner_pretty,
            } => {
                if let (true, Some(indent)) = (inner_pretty, indent) {
                    push_indent(&mut out, indent, depth);
                }
                out.push_str("</");
                out.push_str(&name);
                out.push('>');
                if pretty {
                    out.push('\n');
                }
            }
        }
    }

    log::trace!(
        target: "xml.serializer",
        "rendered {node_count} nodes as {mode:?} ({} bytes)",
        out.len()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact() -> XmlConfig {
        XmlConfig {
            indent: None,
            xml_declaration: false,
            ..XmlConfig::default()
        }
    }

    #[test]
    fn declaration_follows_mode() {
        let root = Memento::new_root("a");
        let config = XmlConfig::default();
        assert_eq!(
            render(&root, &config, NormalizeMode::Utf8).unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a/>\n"
        );
        assert_eq!(
            render(&root, &config, NormalizeMode::Utf16).unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-16\"?>\n<a/>\n"
        );
        assert_eq!(
            render(&root, &config, NormalizeMode::None).unwrap(),
            "<?xml version=\"1.0\"?>\n<a/>\n"
        );
    }

    #[test]
    fn pretty_layout_indents_elements_without_text() {
        let root = Memento::new_root("config");
        root.put_integer("version", 2);
        let user = root.create_child("user");
        user.put_string("name", "ada");
        user.create_child("empty");
        root.create_child("note").put_text_data("hello");

        let config = XmlConfig {
            xml_declaration: false,
            indent: Some("  ".to_string()),
            ..XmlConfig::default()
        };
        assert_eq!(
            render(&root, &config, NormalizeMode::Utf8).unwrap(),
            "<config version=\"2\">\n  <user name=\"ada\">\n    <empty/>\n  </user>\n  <note>hello</note>\n</config>\n"
        );
    }

    #[test]
    fn elements_with_text_render_compactly() {
        let root = Memento::new_root("r");
        let mixed = root.create_child("mixed");
        mixed.put_text_data("t");
        mixed.create_child("a").create_child("b");

        let config = XmlConfig {
            xml_declaration: false,
            ..XmlConfig::default()
        };
        assert_eq!(
            render(&root, &config, NormalizeMode::Utf8).unwrap(),
            "<r>\n    <mixed>t<a><b/></a></mixed>\n</r>\n"
        );
    }

    #[test]
    fn whitespace_text_next_to_children_uses_references() {
        let root = Memento::new_root("r");
        root.put_text_data(" \n");
        root.create_child("a");
        assert_eq!(
            render(&root, &compact(), NormalizeMode::Utf8).unwrap(),
            "<r>&#32;&#10;<a/></r>"
        );

        let leaf = Memento::new_root("leaf");
        leaf.put_text_data("  ");
        assert_eq!(
            render(&leaf, &compact(), NormalizeMode::Utf8).unwrap(),
            "<leaf>  </leaf>"
        );
    }

    #[test]
    fn values_are_escaped() {
        let root = Memento::new_root("r");
        root.put_string("q", "a \"b\" <c> & d\te");
        root.put_text_data("1 < 2 & 3 > 2\r");
        assert_eq!(
            render(&root, &compact(), NormalizeMode::Utf8).unwrap(),
            "<r q=\"a &quot;b&quot; &lt;c&gt; &amp; d&#9;e\">1 &lt; 2 &amp; 3 &gt; 2&#13;</r>"
        );
    }

    #[test]
    fn subtree_renders_as_its_own_document() {
        let root = Memento::new_root("r");
        let child = root.create_child("c");
        child.create_child("d");
        assert_eq!(
            render(&child, &compact(), NormalizeMode::Utf8).unwrap(),
            "<c><d/></c>"
        );
    }

    #[test]
    fn invalid_names_are_rejected() {
        let root = Memento::new_root("bad name");
        assert_eq!(
            render(&root, &compact(), NormalizeMode::Utf8),
            Err(EncodeError::InvalidName("bad name".to_string()))
        );

        let root = Memento::new_root("r");
        root.create_child("ok").put_string("1st", "x");
        assert_eq!(
            render(&root, &compact(), NormalizeMode::Utf8),
            Err(EncodeError::InvalidName("1st".to_string()))
        );
    }

    #[test]
    fn illegal_characters_are_rejected() {
        let root = Memento::new_root("r");
        root.put_text_data("nul\u{0}");
        assert_eq!(
            render(&root, &compact(), NormalizeMode::Utf8),
            Err(EncodeError::InvalidCharacter { code: 0 })
        );
    }

    #[test]
    fn empty_text_next_to_children_is_an_empty_cdata_section() {
        let root = Memento::new_root("r");
        root.put_text_data("");
        root.create_child("a");
        assert_eq!(
            render(&root, &compact(), NormalizeMode::Utf8).unwrap(),
            "<r><![CDATA[]]><a/></r>"
        );
    }

    #[test]
    fn nesting_past_max_depth_is_refused() {
        let config = XmlConfig {
            max_depth: 3,
            ..compact()
        };
        let root = Memento::new_root("a");
        let c = root.create_child("b").create_child("c");
        assert_eq!(
            render(&root, &config, NormalizeMode::Utf8).unwrap(),
            "<a><b><c/></b></a>"
        );

        c.create_child("d");
        assert_eq!(
            render(&root, &config, NormalizeMode::Utf8),
            Err(EncodeError::TooDeep(3))
        );
    }

    #[test]
    fn indentation_stops_growing_past_the_cap() {
        let root = Memento::new_root("n");
        let mut node = root.clone();
        for _ in 0..100 {
            node = node.create_child("n");
        }
        let config = XmlConfig {
            indent: Some("  ".to_string()),
            xml_declaration: false,
            ..XmlConfig::default()
        };
        let out = render(&root, &config, NormalizeMode::Utf8).unwrap();
        let widest = out
            .lines()
            .map(|line| line.len() - line.trim_start().len())
            .max()
            .unwrap();
        assert_eq!(widest, 2 * MAX_INDENT_LEVELS);
        assert_eq!(out.lines().count(), 201);
    }

    #[test]
    fn deep_trees_render_iteratively() {
        let root = Memento::new_root("n");
        let mut node = root.clone();
        for _ in 0..5_000 {
            node = node.create_child("n");
        }
        let config = XmlConfig {
            max_depth: usize::MAX,
            ..compact()
        };
        let out = render(&root, &config, NormalizeMode::Utf8).unwrap();
        assert!(out.starts_with("<n><n><n>"));
        assert!(out.ends_with("<n/></n></n>"));
    }
}
