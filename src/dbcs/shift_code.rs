//! Shift-coded double-byte field
//!
//! Encodes one fixed-width slot holding a double-byte string wrapped in
//! shift-out / shift-in markers.
//!
//! ## Slot Layout (declared size 12, content "あいう")
//! ```text
//! ┌────┬───────────────────┬─────────────────┬────┐
//! │ SO │ content (6 bytes) │ padding units   │ SI │
//! │ 0E │ 4481 4483 4485    │ 4040 4040       │ 0F │
//! └────┴───────────────────┴─────────────────┴────┘
//! ```

use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};

use crate::charset::{DoubleByteCharset, SHIFT_IN, SHIFT_OUT};
use crate::error::{CodecError, ConvertError, Result};

/// Codec for one shift-coded double-byte slot of `declared_size` bytes
#[derive(Debug, Clone)]
pub struct ShiftCodeField {
    /// Field name, used in error reports
    name: String,
    /// Slot width in bytes, shift markers included
    declared_size: usize,
    /// Underlying double-byte encoder/decoder
    charset: Arc<dyn DoubleByteCharset>,
    /// Character used to fill unused space
    padding_char: char,
    /// Padding character's encoding without its own shift markers
    padding_unit: Bytes,
}

impl ShiftCodeField {
    /// Build the codec for one field
    ///
    /// The padding unit is derived here once. Widths that the padding unit
    /// cannot fill exactly are rejected.
    pub fn new(
        name: impl Into<String>,
        declared_size: usize,
        charset: Arc<dyn DoubleByteCharset>,
        padding_char: char,
    ) -> Result<Self> {
        let name = name.into();

        if declared_size < 2 {
            return Err(CodecError::Layout(format!(
                "{}: double-byte field size must be at least 2, got {}",
                name, declared_size
            )));
        }

        let encoded = charset
            .encode(&padding_char.to_string())
            .map_err(|e| CodecError::Layout(format!("{}: cannot encode padding character: {}", name, e)))?;

        if encoded.len() < 3 || encoded[0] != SHIFT_OUT || encoded[encoded.len() - 1] != SHIFT_IN {
            return Err(CodecError::Layout(format!(
                "{}: padding character {:?} is not a double-byte character in {}",
                name,
                padding_char,
                charset.name()
            )));
        }

        let padding_unit = Bytes::copy_from_slice(&encoded[1..encoded.len() - 1]);

        if (declared_size - 2) % padding_unit.len() != 0 {
            return Err(CodecError::Layout(format!(
                "{}: size {} cannot be padded with {}-byte units",
                name,
                declared_size,
                padding_unit.len()
            )));
        }

        Ok(Self {
            name,
            declared_size,
            charset,
            padding_char,
            padding_unit,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_size(&self) -> usize {
        self.declared_size
    }

    pub fn padding_unit(&self) -> &[u8] {
        &self.padding_unit
    }

    /// Decode a full slot; trailing padding characters are trimmed
    ///
    /// Padding characters at the end of the encoded value are trimmed as well,
    /// so `"あ\u{3000}"` reads back as `"あ"`.
    pub fn decode(&self, slot: &[u8]) -> Result<String> {
        if slot.len() != self.declared_size {
            return Err(CodecError::SlotLength {
                field: self.name.clone(),
                expected: self.declared_size,
                actual: slot.len(),
            });
        }

        let text = self
            .charset
            .decode(slot)
            .map_err(|e| CodecError::field_format(&self.name, e))?;

        Ok(text.trim_end_matches(self.padding_char).to_string())
    }

    /// Encode a value into a `declared_size`-byte slot
    pub fn encode(&self, value: Option<&str>) -> Result<Vec<u8>> {
        let value = match value {
            None | Some("") => return self.pad(&[SHIFT_OUT, SHIFT_IN]),
            Some(v) => v,
        };

        let content = self
            .charset
            .encode(value)
            .map_err(|e| CodecError::field_format(&self.name, e))?;

        if content.first() != Some(&SHIFT_OUT) {
            return Err(CodecError::MissingShiftOutCode(value.to_string()));
        }
        if content[1..].contains(&SHIFT_OUT) {
            return Err(CodecError::TooManyShiftOutCode(value.to_string()));
        }
        if content.len() > self.declared_size {
            return Err(CodecError::FieldTooLarge {
                field: self.name.clone(),
                declared: self.declared_size,
                actual: content.len(),
            });
        }
        if content.last() != Some(&SHIFT_IN) {
            return Err(CodecError::field_format(
                &self.name,
                ConvertError::new(format!("cannot find shift in code. data:[{}]", value)),
            ));
        }

        self.pad(&content)
    }

    /// content[..len-1] + padding units + final shift-in
    fn pad(&self, content: &[u8]) -> Result<Vec<u8>> {
        let free = self.declared_size - content.len();
        if free % self.padding_unit.len() != 0 {
            return Err(CodecError::field_format(
                &self.name,
                ConvertError::new(format!(
                    "{} free bytes cannot be filled with {}-byte padding units",
                    free,
                    self.padding_unit.len()
                )),
            ));
        }

        // content always holds at least the SO/SI pair here
        let last = content.len() - 1;

        let mut slot = BytesMut::with_capacity(self.declared_size);
        slot.put_slice(&content[..last]);
        for _ in 0..free / self.padding_unit.len() {
            slot.put_slice(&self.padding_unit);
        }
        slot.put_u8(content[last]);

        Ok(slot.to_vec())
    }
}
