//! Percent encoding for form-urlencoded values
//!
//! Compatible with the classic `application/x-www-form-urlencoded` rules:
//! - `A-Z a-z 0-9 . - * _` are written as-is
//! - space becomes `+`
//! - every other byte of the charset encoding becomes `%XX` (upper-case hex)

use crate::charset::TextCharset;
use crate::error::ConvertError;

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'*' | b'_')
}

/// Percent-encode `text` using the bytes of `charset`
pub fn encode(text: &str, charset: &dyn TextCharset) -> Result<String, ConvertError> {
    let bytes = charset.encode(text)?;
    let mut out = String::with_capacity(bytes.len() * 3);

    for b in bytes {
        if is_unreserved(b) {
            out.push(b as char);
        } else if b == b' ' {
            out.push('+');
        } else {
            out.push('%');
            out.push(HEX_UPPER[(b >> 4) as usize] as char);
            out.push(HEX_UPPER[(b & 0x0F) as usize] as char);
        }
    }

    Ok(out)
}

/// Percent-decode `text`, interpreting escaped bytes with `charset`
///
/// Consecutive `%XX` escapes are collected and decoded together so that
/// multi-byte characters survive.
pub fn decode(text: &str, charset: &dyn TextCharset) -> Result<String, ConvertError> {
    let mut out = String::with_capacity(text.len());
    let mut pending: Vec<u8> = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3).ok_or_else(|| {
                ConvertError::new(format!("incomplete trailing escape (%) pattern in [{}]", text))
            })?;
            let byte = match (hex_value(hex[0]), hex_value(hex[1])) {
                (Some(hi), Some(lo)) => (hi << 4) | lo,
                _ => {
                    return Err(ConvertError::new(format!(
                        "illegal hex characters in escape (%) pattern in [{}]",
                        text
                    )))
                }
            };
            pending.push(byte);
            i += 3;
            continue;
        }

        if !pending.is_empty() {
            out.push_str(&charset.decode(&pending)?);
            pending.clear();
        }

        // Multi-byte UTF-8 chars in the source text are copied whole
        let ch = text[i..].chars().next().unwrap_or_default();
        out.push(if ch == '+' { ' ' } else { ch });
        i += ch.len_utf8();
    }

    if !pending.is_empty() {
        out.push_str(&charset.decode(&pending)?);
    }

    Ok(out)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
