//! Document-level encoding detection and output encoding.
//!
//! Detection follows the byte-order-mark and `<?` heuristics for UTF-8 and
//! UTF-16; anything else is treated as UTF-8. Declared `encoding=` values are
//! not consulted: the bytes themselves decide.
use crate::DecodeError;
use crate::utf8::{self, UTF8_BOM};
use crate::utf16::{self, Endian, UTF16BE_BOM, UTF16LE_BOM};
use core_types::NormalizeMode;
use std::borrow::Cow;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

/// Detect the encoding of a document and the length of its byte order mark.
pub fn sniff_encoding(bytes: &[u8]) -> (Encoding, usize) {
    if bytes.starts_with(UTF8_BOM) {
        return (Encoding::Utf8, UTF8_BOM.len());
    }
    if bytes.starts_with(UTF16LE_BOM) {
        return (Encoding::Utf16Le, UTF16LE_BOM.len());
    }
    if bytes.starts_with(UTF16BE_BOM) {
        return (Encoding::Utf16Be, UTF16BE_BOM.len());
    }
    // BOM-less UTF-16 documents open with `<`, declaration or not.
    match bytes {
        [b'<', 0, ..] => (Encoding::Utf16Le, 0),
        [0, b'<', ..] => (Encoding::Utf16Be, 0),
        _ => (Encoding::Utf8, 0),
    }
}

/// Decode a whole document to text, dropping any byte order mark.
///
/// UTF-8 input is borrowed when possible.
pub fn decode_document(bytes: &[u8]) -> Result<Cow<'_, str>, DecodeError> {
    let (encoding, bom_len) = sniff_encoding(bytes);
    let body = &bytes[bom_len..];
    match encoding {
        Encoding::Utf8 => utf8::decode_strict(body).map(Cow::Borrowed),
        Encoding::Utf16Le => utf16::decode(body, Endian::Little).map(Cow::Owned),
        Encoding::Utf16Be => utf16::decode(body, Endian::Big).map(Cow::Owned),
    }
}

/// Encode rendered text into the byte form selected by `mode`.
pub fn encode_document(text: String, mode: NormalizeMode) -> Vec<u8> {
    match mode {
        NormalizeMode::None | NormalizeMode::Utf8 => text.into_bytes(),
        NormalizeMode::Utf16 => utf16::encode_le_with_bom(&text),
    }
}
