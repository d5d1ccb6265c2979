//! Hierarchical mementos persisted as XML.
//!
//! [`Memento`] is the in-memory tree; [`XmlMemento`] loads and saves it as an
//! XML document. Other formats plug in through [`TreeCodec`].
//!
//! ```
//! use xml_memento::{Memento, NormalizeMode, XmlMemento};
//!
//! let root = Memento::new_root("config");
//! root.create_child("user").put_string("name", "ada");
//!
//! let text = XmlMemento::save_to_string(&root, NormalizeMode::Utf8)?;
//! let loaded = XmlMemento::load_from_str(&text)?;
//! assert_eq!(
//!     loaded.child_from_path("user").and_then(|u| u.get_string("name")).as_deref(),
//!     Some("ada")
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub use core_types::NormalizeMode;
pub use memento::{
    EncodeError, ID_KEY, LoadError, Memento, ParseError, ParseErrorKind, SaveError, TreeCodec,
    Uuid, load_from_bytes, load_from_file, load_from_str, path, tree_snapshot,
};
pub use xml::{XmlCodec, XmlConfig, XmlMemento};
