//! Double-byte field without shift markers on the wire
//!
//! Reads add synthetic shift-out / shift-in bytes around the raw slot before
//! decoding; writes encode into a slot two bytes wider and strip them again.

use std::sync::Arc;

use bytes::{BufMut, BytesMut};

use crate::charset::{DoubleByteCharset, SHIFT_IN, SHIFT_OUT};
use crate::error::{CodecError, Result};

use super::ShiftCodeField;

/// Double-byte slot of `size` bytes carrying no shift markers
#[derive(Debug, Clone)]
pub struct NoShiftCodeField {
    size: usize,
    /// Same field configured at `size + 2`
    inner: ShiftCodeField,
}

impl NoShiftCodeField {
    pub fn new(
        name: impl Into<String>,
        size: usize,
        charset: Arc<dyn DoubleByteCharset>,
        padding_char: char,
    ) -> Result<Self> {
        let inner = ShiftCodeField::new(name, size + 2, charset, padding_char)?;
        Ok(Self { size, inner })
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Slot width on the wire
    pub fn declared_size(&self) -> usize {
        self.size
    }

    pub fn decode(&self, raw: &[u8]) -> Result<String> {
        if raw.len() != self.size {
            return Err(CodecError::SlotLength {
                field: self.inner.name().to_string(),
                expected: self.size,
                actual: raw.len(),
            });
        }

        let mut slot = BytesMut::with_capacity(raw.len() + 2);
        slot.put_u8(SHIFT_OUT);
        slot.put_slice(raw);
        slot.put_u8(SHIFT_IN);

        self.inner.decode(&slot)
    }

    pub fn encode(&self, value: Option<&str>) -> Result<Vec<u8>> {
        let slot = self.inner.encode(value).map_err(|e| match e {
            // report sizes as seen on the wire
            CodecError::FieldTooLarge { field, declared, actual } => CodecError::FieldTooLarge {
                field,
                declared: declared - 2,
                actual: actual - 2,
            },
            other => other,
        })?;
        Ok(slot[1..slot.len() - 1].to_vec())
    }
}
