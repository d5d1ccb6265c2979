//! Builds a memento tree from a token stream, enforcing element nesting.
use crate::XmlConfig;
use crate::atom::AtomId;
use crate::types::{Token, TokenStream};
use memento::{Memento, ParseError, ParseErrorKind};

/// Element whose end tag has not been seen yet.
struct OpenElement {
    node: Memento,
    name: AtomId,
    /// Every piece of character data, used when the element stays a leaf.
    all_text: String,
    /// Character data that was not whitespace-only in the source. An empty
    /// CDATA section counts, so `<a><![CDATA[]]><b/></a>` keeps empty text.
    significant_text: String,
    significant: bool,
    has_children: bool,
}

impl OpenElement {
    fn new(node: Memento, name: AtomId) -> Self {
        Self {
            node,
            name,
            all_text: String::new(),
            significant_text: String::new(),
            significant: false,
            has_children: false,
        }
    }

    /// Text the element carries once its end tag is seen.
    ///
    /// A leaf keeps all of its character data, so `<a></a>` has empty text.
    /// With child elements, whitespace-only runs are indentation.
    fn into_text(self) -> (Memento, Option<String>) {
        let text = if !self.has_children {
            Some(self.all_text)
        } else if self.significant {
            Some(self.significant_text)
        } else {
            None
        };
        (self.node, text)
    }
}

/// Build a tree from `stream`.
///
/// Either returns the complete root or an error; a partially built tree is
/// never handed out.
pub fn build_tree(stream: &TokenStream, config: &XmlConfig) -> Result<Memento, ParseError> {
    build(stream, config).inspect_err(|err| {
        log::debug!(target: "xml.tree_builder", "parse failed at byte {}: {}", err.offset, err.kind);
    })
}

fn build(stream: &TokenStream, config: &XmlConfig) -> Result<Memento, ParseError> {
    let atoms = stream.atoms();
    let mut root: Option<Memento> = None;
    let mut open: Vec<OpenElement> = Vec::new();

    for token in stream.iter() {
        match token {
            Token::Text {
                text,
                ignorable,
                offset,
            } => match open.last_mut() {
                Some(element) => {
                    element.all_text.push_str(text);
                    if !*ignorable {
                        element.significant = true;
                        element.significant_text.push_str(text);
                    }
                }
                None if *ignorable => {}
                None => return Err(ParseError::new(ParseErrorKind::TextOutsideRoot, *offset)),
            },
            Token::StartTag {
                name,
                attributes,
                self_closing,
                offset,
            } => {
                let name_str = atoms.resolve(*name);
                if open.len() >= config.max_depth {
                    return Err(ParseError::new(
                        ParseErrorKind::TooDeep(config.max_depth),
                        *offset,
                    ));
                }
                let node = match open.last_mut() {
                    Some(parent) => {
                        parent.has_children = true;
                        parent.node.create_child(name_str)
                    }
                    None if root.is_some() => {
                        return Err(ParseError::new(ParseErrorKind::MultipleRoots, *offset));
                    }
                    None => {
                        let node = Memento::new_root(name_str);
                        root = Some(node.clone());
                        node
                    }
                };
                for (key, value) in attributes {
                    node.put_string(atoms.resolve(*key), value);
                }
                if *self_closing {
                    log::trace!(target: "xml.tree_builder", "empty element <{name_str}/>");
                } else {
                    log::trace!(
                        target: "xml.tree_builder",
                        "push <{name_str}> depth={}",
                        open.len() + 1
                    );
                    open.push(OpenElement::new(node, *name));
                }
            }
            Token::EndTag { name, offset } => {
                let Some(element) = open.pop() else {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedEndTag(atoms.resolve(*name).to_string()),
                        *offset,
                    ));
                };
                if element.name != *name {
                    return Err(ParseError::new(
                        ParseErrorKind::MismatchedEndTag {
                            expected: atoms.resolve(element.name).to_string(),
                            found: atoms.resolve(*name).to_string(),
                        },
                        *offset,
                    ));
                }
                log::trace!(
                    target: "xml.tree_builder",
                    "pop </{}> depth={}",
                    atoms.resolve(*name),
                    open.len() + 1
                );
                let (node, text) = element.into_text();
                if let Some(text) = text {
                    node.put_text_data(&text);
                }
            }
        }
    }

    if let Some(element) = open.last() {
        return Err(ParseError::new(
            ParseErrorKind::UnclosedElement(atoms.resolve(element.name).to_string()),
            stream.end(),
        ));
    }
    root.ok_or_else(|| ParseError::new(ParseErrorKind::NoRootElement, stream.end()))
}
