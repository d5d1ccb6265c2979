//! Strict UTF-8 helpers for whole-document byte buffers.
//!
//! Unlike lossy decoding, these never substitute U+FFFD: a document with
//! invalid bytes is rejected so a load cannot silently alter content.
use crate::DecodeError;

pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Borrow `bytes` as `str`, reporting where the first invalid sequence starts.
pub fn decode_strict(bytes: &[u8]) -> Result<&str, DecodeError> {
    std::str::from_utf8(bytes).map_err(|e| DecodeError::InvalidUtf8 {
        valid_up_to: e.valid_up_to(),
    })
}
