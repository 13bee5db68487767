//! Character sets
//!
//! Two collaborator seams:
//! - [`TextCharset`]: byte <-> text conversion for keyed records
//! - [`DoubleByteCharset`]: mixed single/double-byte encodings where
//!   double-byte regions are delimited by shift-out / shift-in bytes
//!
//! ## Shift-Coded Byte Layout
//! ```text
//! ┌──────┬────────────┬──────┬──────┬────────────┬──────┐
//! │ SB.. │ SO (0x0E)  │ DB.. │ SI   │ SB..       │ ...  │
//! └──────┴────────────┴──────┴──────┴────────────┴──────┘
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::error::ConvertError;

/// Shift-out marker: start of a double-byte region
pub const SHIFT_OUT: u8 = 0x0E;

/// Shift-in marker: end of a double-byte region
pub const SHIFT_IN: u8 = 0x0F;

// =============================================================================
// Text Charsets
// =============================================================================

/// Converts between text and bytes for one character encoding
pub trait TextCharset: fmt::Debug + Send + Sync {
    /// Canonical charset name (e.g. "UTF-8")
    fn name(&self) -> &str;

    fn encode(&self, text: &str) -> Result<Vec<u8>, ConvertError>;

    fn decode(&self, bytes: &[u8]) -> Result<String, ConvertError>;
}

/// UTF-8 text charset
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8;

impl TextCharset for Utf8 {
    fn name(&self) -> &str {
        "UTF-8"
    }

    fn encode(&self, text: &str) -> Result<Vec<u8>, ConvertError> {
        Ok(text.as_bytes().to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> Result<String, ConvertError> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| ConvertError::new(format!("invalid UTF-8 sequence: {}", e)))
    }
}

// =============================================================================
// Double-Byte Charsets
// =============================================================================

/// Encoder/decoder for a shift-coded double-byte character set
///
/// `encode` wraps every double-byte run in [`SHIFT_OUT`] .. [`SHIFT_IN`];
/// `decode` consumes those markers.
pub trait DoubleByteCharset: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn encode(&self, text: &str) -> Result<Vec<u8>, ConvertError>;

    fn decode(&self, bytes: &[u8]) -> Result<String, ConvertError>;
}

/// Table-driven shift-coded charset
///
/// Characters are looked up in a single-byte table first, then in the
/// double-byte table. Switching between the two emits the shift markers.
#[derive(Debug, Clone, Default)]
pub struct TableDoubleByteCharset {
    name: String,
    single: HashMap<char, u8>,
    double: HashMap<char, [u8; 2]>,
    single_rev: HashMap<u8, char>,
    double_rev: HashMap<[u8; 2], char>,
}

impl TableDoubleByteCharset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Map a character to a single-byte code
    pub fn with_single(mut self, ch: char, code: u8) -> Self {
        self.single.insert(ch, code);
        self.single_rev.insert(code, ch);
        self
    }

    /// Map a character to a double-byte code
    pub fn with_double(mut self, ch: char, code: [u8; 2]) -> Self {
        self.double.insert(ch, code);
        self.double_rev.insert(code, ch);
        self
    }
}

impl DoubleByteCharset for TableDoubleByteCharset {
    fn name(&self) -> &str {
        &self.name
    }

    fn encode(&self, text: &str) -> Result<Vec<u8>, ConvertError> {
        let mut out = Vec::with_capacity(text.len() * 2 + 2);
        let mut in_double = false;

        for ch in text.chars() {
            if let Some(&code) = self.single.get(&ch) {
                if in_double {
                    out.push(SHIFT_IN);
                    in_double = false;
                }
                out.push(code);
            } else if let Some(code) = self.double.get(&ch) {
                if !in_double {
                    out.push(SHIFT_OUT);
                    in_double = true;
                }
                out.extend_from_slice(code);
            } else {
                return Err(ConvertError::new(format!(
                    "unmappable character {:?} for charset {}",
                    ch, self.name
                )));
            }
        }

        if in_double {
            out.push(SHIFT_IN);
        }
        Ok(out)
    }

    fn decode(&self, bytes: &[u8]) -> Result<String, ConvertError> {
        let mut out = String::with_capacity(bytes.len());
        let mut in_double = false;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                SHIFT_OUT => {
                    in_double = true;
                    i += 1;
                }
                SHIFT_IN => {
                    in_double = false;
                    i += 1;
                }
                _ if in_double => {
                    let pair = bytes.get(i..i + 2).ok_or_else(|| {
                        ConvertError::new(format!("truncated double-byte character at offset {}", i))
                    })?;
                    let code = [pair[0], pair[1]];
                    let ch = self.double_rev.get(&code).ok_or_else(|| {
                        ConvertError::new(format!(
                            "undefined double-byte code 0x{:02x}{:02x} at offset {}",
                            code[0], code[1], i
                        ))
                    })?;
                    out.push(*ch);
                    i += 2;
                }
                code => {
                    let ch = self.single_rev.get(&code).ok_or_else(|| {
                        ConvertError::new(format!(
                            "undefined single-byte code 0x{:02x} at offset {}",
                            code, i
                        ))
                    })?;
                    out.push(*ch);
                    i += 1;
                }
            }
        }

        Ok(out)
    }
}
