use crate::DecodeError;

pub const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
pub const UTF16BE_BOM: &[u8] = &[0xFE, 0xFF];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// Decode UTF-16 code units; unpaired surrogates are an error, not U+FFFD.
pub fn decode(bytes: &[u8], endian: Endian) -> Result<String, DecodeError> {
    if bytes.len() % 2 != 0 {
        return Err(DecodeError::OddUtf16Length);
    }
    let units = bytes.chunks_exact(2).map(|pair| match endian {
        Endian::Little => u16::from_le_bytes([pair[0], pair[1]]),
        Endian::Big => u16::from_be_bytes([pair[0], pair[1]]),
    });

    let mut out = String::with_capacity(bytes.len() / 2);
    // Track the byte offset of each decoded char for error reporting.
    let mut offset = 0usize;
    for decoded in char::decode_utf16(units) {
        match decoded {
            Ok(ch) => {
                out.push(ch);
                offset += ch.len_utf16() * 2;
            }
            Err(_) => return Err(DecodeError::InvalidUtf16 { offset }),
        }
    }
    Ok(out)
}

/// Encode as UTF-16LE, prefixed with a byte order mark.
pub fn encode_le_with_bom(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(UTF16LE_BOM.len() + text.len() * 2);
    out.extend_from_slice(UTF16LE_BOM);
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_with_bom_and_surrogate_pairs() {
        let bytes = encode_le_with_bom("a😀");
        assert_eq!(&bytes[..2], UTF16LE_BOM);
        assert_eq!(&bytes[2..4], &[b'a', 0]);
        // U+1F600 -> D83D DE00
        assert_eq!(&bytes[4..], &[0x3D, 0xD8, 0x00, 0xDE]);
    }

    #[test]
    fn decodes_both_byte_orders() {
        assert_eq!(decode(&[b'h', 0, b'i', 0], Endian::Little).unwrap(), "hi");
        assert_eq!(decode(&[0, b'h', 0, b'i'], Endian::Big).unwrap(), "hi");
    }

    #[test]
    fn encode_then_decode_preserves_non_bmp_text() {
        let text = "naïve 😀 €";
        let bytes = encode_le_with_bom(text);
        assert_eq!(decode(&bytes[2..], Endian::Little).unwrap(), text);
    }

    #[test]
    fn rejects_odd_length() {
        assert_eq!(
            decode(&[b'a', 0, b'b'], Endian::Little),
            Err(DecodeError::OddUtf16Length)
        );
    }

    #[test]
    fn rejects_unpaired_surrogate_with_offset() {
        // 'a', then a lone high surrogate D800, then 'b'.
        let bytes = [b'a', 0, 0x00, 0xD8, b'b', 0];
        assert_eq!(
            decode(&bytes, Endian::Little),
            Err(DecodeError::InvalidUtf16 { offset: 2 })
        );
    }
}
