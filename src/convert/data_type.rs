//! Field data types
//!
//! A [`DataType`] is one of a closed set of wire representations. Codecs reach
//! it through the capability they need:
//! - [`CharacterDataType`] for character streams (keyed records)
//! - [`ByteDataType`] for fixed-width byte slots

use crate::dbcs::{NoShiftCodeField, ShiftCodeField};
use crate::error::Result;
use crate::value::Value;

/// Data type of a field inside a character stream
pub trait CharacterDataType {
    fn decode_text(&self, raw: Option<&str>) -> Result<Value>;

    /// `None` means nothing is written for this value
    fn encode_text(&self, value: &Value) -> Result<Option<String>>;
}

/// Data type of a field occupying a fixed-width byte slot
pub trait ByteDataType {
    fn declared_size(&self) -> usize;

    fn decode_bytes(&self, slot: &[u8]) -> Result<Value>;

    fn encode_bytes(&self, value: &Value) -> Result<Vec<u8>>;
}

/// Plain string; absent stays null, everything else is kept verbatim
#[derive(Debug, Clone, Copy, Default)]
pub struct NullableString;

impl CharacterDataType for NullableString {
    fn decode_text(&self, raw: Option<&str>) -> Result<Value> {
        Ok(raw.map_or(Value::Null, |s| Value::Text(s.to_string())))
    }

    fn encode_text(&self, value: &Value) -> Result<Option<String>> {
        Ok(value.as_text().map(str::to_string))
    }
}

impl ByteDataType for ShiftCodeField {
    fn declared_size(&self) -> usize {
        ShiftCodeField::declared_size(self)
    }

    fn decode_bytes(&self, slot: &[u8]) -> Result<Value> {
        self.decode(slot).map(Value::Text)
    }

    fn encode_bytes(&self, value: &Value) -> Result<Vec<u8>> {
        self.encode(value.as_text())
    }
}

impl ByteDataType for NoShiftCodeField {
    fn declared_size(&self) -> usize {
        NoShiftCodeField::declared_size(self)
    }

    fn decode_bytes(&self, slot: &[u8]) -> Result<Value> {
        self.decode(slot).map(Value::Text)
    }

    fn encode_bytes(&self, value: &Value) -> Result<Vec<u8>> {
        self.encode(value.as_text())
    }
}

/// Wire representation of one field
#[derive(Debug, Clone)]
pub enum DataType {
    /// `X`, `N`, `XN`, `X9`, `SX9` in keyed layouts
    NullableString(NullableString),

    /// `ESN(size)`: shift-coded double-byte slot
    DoubleByte(ShiftCodeField),

    /// `EN(size)`: double-byte slot without shift markers
    DoubleByteNoShiftCode(NoShiftCodeField),
}

impl DataType {
    pub fn nullable_string() -> Self {
        DataType::NullableString(NullableString)
    }

    pub fn as_character(&self) -> Option<&dyn CharacterDataType> {
        match self {
            DataType::NullableString(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&dyn ByteDataType> {
        match self {
            DataType::NullableString(_) => None,
            DataType::DoubleByte(t) => Some(t),
            DataType::DoubleByteNoShiftCode(t) => Some(t),
        }
    }

    /// Slot width for byte-slot types
    pub fn declared_size(&self) -> Option<usize> {
        self.as_bytes().map(|t| t.declared_size())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::NullableString(_) => "NullableString",
            DataType::DoubleByte(_) => "DoubleByte",
            DataType::DoubleByteNoShiftCode(_) => "DoubleByteNoShiftCode",
        }
    }
}

impl Default for DataType {
    fn default() -> Self {
        DataType::nullable_string()
    }
}
