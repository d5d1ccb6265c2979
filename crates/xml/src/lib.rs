//! XML persistence for memento trees.
//!
//! Each node is one element, each attribute one `key="value"` pair, children
//! nest in order and a node's text is the element's character content.
//!
//! ```
//! use memento::NormalizeMode;
//! use xml::XmlMemento;
//!
//! let root = XmlMemento::load_from_str(r#"<config><user name="ada"/></config>"#)?;
//! let user = root.child("user").expect("user element");
//! user.put_integer("age", 36);
//!
//! let text = XmlMemento::save_to_string(&root, NormalizeMode::Utf8)?;
//! assert!(text.contains(r#"<user name="ada" age="36"/>"#));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
mod atom;
mod entities;
mod names;
mod serializer;
mod tokenizer;
mod tree_builder;
mod types;

use core_types::NormalizeMode;
use memento::{EncodeError, LoadError, Memento, ParseError, SaveError, TreeCodec};
use std::path::Path;

/// Parser and renderer settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlConfig {
    /// Indentation per nesting level; `None` writes everything on one line.
    pub indent: Option<String>,
    /// Deepest element nesting accepted when parsing (the root is depth 1).
    pub max_depth: usize,
    /// Whether rendered documents start with an `<?xml ...?>` declaration.
    pub xml_declaration: bool,
}

impl Default for XmlConfig {
    fn default() -> Self {
        Self {
            indent: Some("    ".to_string()),
            max_depth: 1024,
            xml_declaration: true,
        }
    }
}

/// [`TreeCodec`] for XML documents.
#[derive(Clone, Debug, Default)]
pub struct XmlCodec {
    config: XmlConfig,
}

impl XmlCodec {
    pub fn new(config: XmlConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &XmlConfig {
        &self.config
    }
}

impl TreeCodec for XmlCodec {
    fn parse_text(&self, text: &str) -> Result<Memento, ParseError> {
        // A BOM that survived decoding is not character data.
        let (text, bom_len) = match text.strip_prefix('\u{FEFF}') {
            Some(rest) => (rest, '\u{FEFF}'.len_utf8()),
            None => (text, 0),
        };
        let stream = tokenizer::tokenize(text).map_err(|err| shift(err, bom_len))?;
        tree_builder::build_tree(&stream, &self.config).map_err(|err| shift(err, bom_len))
    }

    fn render_text(&self, root: &Memento, mode: NormalizeMode) -> Result<String, EncodeError> {
        serializer::render(root, &self.config, mode)
    }
}

fn shift(mut err: ParseError, by: usize) -> ParseError {
    err.offset += by;
    err
}

/// Entry points bound to the default [`XmlCodec`].
pub struct XmlMemento;

impl XmlMemento {
    pub fn load_from_str(text: &str) -> Result<Memento, ParseError> {
        memento::load_from_str(&XmlCodec::default(), text)
    }

    /// Accepts UTF-8 or UTF-16 with or without a byte-order mark.
    pub fn load_from_bytes(bytes: &[u8]) -> Result<Memento, ParseError> {
        memento::load_from_bytes(&XmlCodec::default(), bytes)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Memento, LoadError> {
        memento::load_from_file(&XmlCodec::default(), path)
    }

    pub fn save_to_string(root: &Memento, mode: NormalizeMode) -> Result<String, EncodeError> {
        root.save_to_string(&XmlCodec::default(), mode)
    }

    pub fn save_to_bytes(root: &Memento, mode: NormalizeMode) -> Result<Vec<u8>, EncodeError> {
        root.save_to_bytes(&XmlCodec::default(), mode)
    }

    pub fn save_to_file(
        root: &Memento,
        path: impl AsRef<Path>,
        mode: NormalizeMode,
    ) -> Result<(), SaveError> {
        root.save_to_file(&XmlCodec::default(), path, mode)
    }
}
