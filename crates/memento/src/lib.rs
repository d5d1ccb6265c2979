//! Memento trees: named nodes with string attributes, ordered children and
//! optional text, plus a format-agnostic persistence contract.
//!
//! The tree itself knows nothing about XML or any other format; a
//! [`TreeCodec`] supplies parsing and rendering, and [`persist`] wraps a codec
//! with string, byte and file entry points.

pub mod codec;
pub mod error;
pub mod path;
pub mod persist;
pub mod tree_snapshot;
pub mod value;

mod arena;
mod node;

pub use crate::codec::TreeCodec;
pub use crate::error::{EncodeError, LoadError, ParseError, ParseErrorKind, SaveError};
pub use crate::node::{ID_KEY, Memento};
pub use crate::persist::{load_from_bytes, load_from_file, load_from_str};
pub use core_types::NormalizeMode;
pub use uuid::Uuid;
