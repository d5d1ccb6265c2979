//! Text encodings for typed attribute values.
//!
//! Every parser here is total: malformed text yields `None`, the same signal
//! as a missing attribute.
use uuid::Uuid;

const HYPHENATED_UUID_LEN: usize = 36;

/// `true`/`false`, ASCII case-insensitive.
pub fn parse_boolean(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

pub fn format_boolean(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

/// Decimal `i32` with an optional sign; surrounding whitespace is rejected.
pub fn parse_integer(text: &str) -> Option<i32> {
    text.parse().ok()
}

pub fn format_integer(value: i32) -> String {
    value.to_string()
}

/// Accepts surrounding whitespace, exponents, `NaN` and `inf`/`Infinity`.
pub fn parse_double(text: &str) -> Option<f64> {
    text.trim().parse().ok()
}

/// Shortest decimal that parses back to the identical `f64`.
pub fn format_double(value: f64) -> String {
    value.to_string()
}

/// Hyphenated UUID, case-insensitive, optionally wrapped in one `{}` pair.
pub fn parse_guid(text: &str) -> Option<Uuid> {
    let inner = text
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(text);
    if inner.len() != HYPHENATED_UUID_LEN {
        return None;
    }
    Uuid::try_parse(inner).ok()
}

/// Lowercase hyphenated form without braces.
pub fn format_guid(value: Uuid) -> String {
    value.hyphenated().to_string()
}
