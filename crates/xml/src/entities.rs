use crate::names::is_xml_char;
use memento::EncodeError;
use std::borrow::Cow;

/// Decode the predefined XML entities and character references.
///
/// Contract:
/// - Named entities decoded: `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`.
/// - Numeric references decoded only when well-formed and semicolon-terminated:
///   `&#123;` (decimal) and `&#x1F4A9;` (hex).
/// - Only characters allowed in an XML document decode; others pass through
///   unchanged.
/// - Missing semicolons, unknown names, malformed numerics, or overlong digit
///   runs are left unchanged.
///
/// DTD-declared entities are not resolved.
pub(crate) fn decode_entities(s: &str) -> Cow<'_, str> {
    let Some(first) = memchr::memchr(b'&', s.as_bytes()) else {
        return Cow::Borrowed(s);
    };

    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut i = first;
    let mut copy_start = 0;

    const MAX_HEX_DIGITS: usize = 6; // 0x10FFFF
    const MAX_DEC_DIGITS: usize = 7; // 1114111

    // Bounded scan to avoid quadratic behavior on adversarial input.
    fn scan_numeric_reference(
        bytes: &[u8],
        start: usize,
        max_digits: usize,
        is_hex: bool,
    ) -> Option<usize> {
        let mut j = start;
        let mut digits = 0usize;

        while j < bytes.len() {
            let b = bytes[j];
            if b == b';' {
                return (digits > 0).then_some(j);
            }
            if digits == max_digits {
                return None;
            }
            let ok = if is_hex {
                b.is_ascii_hexdigit()
            } else {
                b.is_ascii_digit()
            };
            if !ok {
                return None;
            }
            digits += 1;
            j += 1;
        }

        None
    }

    fn starts_with_bytes(bytes: &[u8], i: usize, pat: &[u8]) -> bool {
        bytes.get(i..i + pat.len()).is_some_and(|s| s == pat)
    }

    const NAMED: [(&[u8], char); 5] = [
        (b"&amp;", '&'),
        (b"&lt;", '<'),
        (b"&gt;", '>'),
        (b"&quot;", '"'),
        (b"&apos;", '\''),
    ];

    'scan: while i < bytes.len() {
        if bytes[i] != b'&' {
            i += 1;
            continue;
        }

        // Flush bytes up to '&' unchanged (preserves UTF-8).
        if copy_start < i {
            out.push_str(&s[copy_start..i]);
        }

        for (pattern, ch) in NAMED {
            if starts_with_bytes(bytes, i, pattern) {
                out.push(ch);
                i += pattern.len();
                copy_start = i;
                continue 'scan;
            }
        }

        let numeric = if starts_with_bytes(bytes, i, b"&#x") {
            Some((i + 3, MAX_HEX_DIGITS, true))
        } else if starts_with_bytes(bytes, i, b"&#") {
            Some((i + 2, MAX_DEC_DIGITS, false))
        } else {
            None
        };
        if let Some((digits_start, max_digits, is_hex)) = numeric {
            if let Some(end) = scan_numeric_reference(bytes, digits_start, max_digits, is_hex) {
                let digits = &s[digits_start..end];
                let radix = if is_hex { 16 } else { 10 };
                let decoded = u32::from_str_radix(digits, radix)
                    .ok()
                    .and_then(char::from_u32)
                    .filter(|&ch| is_xml_char(ch));
                match decoded {
                    Some(ch) => out.push(ch),
                    // Known end; preserve entire sequence unchanged.
                    None => out.push_str(&s[i..=end]),
                }
                i = end + 1;
                copy_start = i;
                continue;
            }
        }

        // fallback to keep '&' as-is
        out.push('&');
        i += 1;
        copy_start = i;
    }

    if copy_start < bytes.len() {
        out.push_str(&s[copy_start..]);
    }

    Cow::Owned(out)
}

/// Apply the XML end-of-line rule: `\r\n` and lone `\r` become `\n`.
pub(crate) fn normalize_newlines(s: &str) -> Cow<'_, str> {
    if memchr::memchr(b'\r', s.as_bytes()).is_none() {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Attribute-value normalization for literal whitespace: after the
/// end-of-line rule, tab and newline become a space. References are decoded
/// afterwards, so `&#10;` still yields a newline.
pub(crate) fn normalize_attribute_whitespace(s: &str) -> Cow<'_, str> {
    let s = normalize_newlines(s);
    if !s.bytes().any(|b| b == b'\t' || b == b'\n') {
        return s;
    }
    Cow::Owned(s.replace(['\t', '\n'], " "))
}

fn check_char(ch: char) -> Result<(), EncodeError> {
    if is_xml_char(ch) {
        Ok(())
    } else {
        Err(EncodeError::InvalidCharacter { code: ch as u32 })
    }
}

/// Escape element content. `\r` is written as a reference so the
/// end-of-line rule cannot fold it away on the next parse.
pub(crate) fn escape_text(out: &mut String, text: &str) -> Result<(), EncodeError> {
    for ch in text.chars() {
        check_char(ch)?;
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(ch),
        }
    }
    Ok(())
}

/// Write every character as a numeric reference.
///
/// Used for whitespace-only text that would otherwise read back as
/// indentation.
pub(crate) fn escape_all(out: &mut String, text: &str) -> Result<(), EncodeError> {
    for ch in text.chars() {
        check_char(ch)?;
        out.push_str("&#");
        out.push_str(&(ch as u32).to_string());
        out.push(';');
    }
    Ok(())
}

/// Escape a double-quoted attribute value, keeping literal whitespace intact
/// through attribute-value normalization.
pub(crate) fn escape_attribute(out: &mut String, value: &str) -> Result<(), EncodeError> {
    for ch in value.chars() {
        check_char(ch)?;
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(ch),
        }
    }
    Ok(())
}
