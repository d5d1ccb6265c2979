//! Byte-level text encoding helpers shared by the codecs.

pub mod encoding;
pub mod utf16;
pub mod utf8;

pub use encoding::{Encoding, decode_document, encode_document, sniff_encoding};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid UTF-8 after {valid_up_to} bytes")]
    InvalidUtf8 { valid_up_to: usize },
    #[error("unpaired UTF-16 surrogate at byte {offset}")]
    InvalidUtf16 { offset: usize },
    #[error("UTF-16 input has an odd number of bytes")]
    OddUtf16Length,
}
