//! Field definitions
//!
//! A field couples its name and cardinality with the conversion pipeline that
//! turns raw wire data into a [`Value`] and back.

use std::sync::Arc;

use crate::convert::{ByteDataType, CharacterDataType, DataType, ValueConverter};
use crate::error::{CodecError, Result};
use crate::value::Value;

/// Inclusive bounds on the number of values of an array field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayBounds {
    pub min: usize,
    pub max: usize,
}

impl ArrayBounds {
    /// `[*]`: any number of values
    pub const UNBOUNDED: ArrayBounds = ArrayBounds { min: 0, max: usize::MAX };

    pub fn contains(&self, count: usize) -> bool {
        self.min <= count && count <= self.max
    }
}

/// Immutable description of one field
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    name: String,
    position: usize,
    required: bool,
    array: Option<ArrayBounds>,
    data_type: DataType,
    converters: Vec<Arc<dyn ValueConverter>>,
}

impl FieldDefinition {
    /// Start building a field; defaults to a required nullable string
    pub fn builder(name: impl Into<String>) -> FieldBuilder {
        FieldBuilder {
            field: FieldDefinition {
                name: name.into(),
                position: 0,
                required: true,
                array: None,
                data_type: DataType::default(),
                converters: Vec::new(),
            },
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 1-based position from the layout (0 when built in code)
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_array(&self) -> bool {
        self.array.is_some()
    }

    pub fn array_bounds(&self) -> Option<ArrayBounds> {
        self.array
    }

    pub fn min_array_size(&self) -> usize {
        self.array.map_or(0, |b| b.min)
    }

    pub fn max_array_size(&self) -> usize {
        self.array.map_or(0, |b| b.max)
    }

    /// Byte width for byte-slot data types
    pub fn declared_size(&self) -> Option<usize> {
        self.data_type.declared_size()
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn converters(&self) -> &[Arc<dyn ValueConverter>] {
        &self.converters
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    /// Raw text -> value: data type first, then converters in order
    pub fn decode_text(&self, raw: Option<&str>) -> Result<Value> {
        let value = self.character_type()?.decode_text(raw)?;
        self.apply_decoders(value)
    }

    /// Value -> raw text: converters in reverse, then the data type
    pub fn encode_text(&self, value: Value) -> Result<Option<String>> {
        let value = self.apply_encoders(value)?;
        self.character_type()?.encode_text(&value)
    }

    /// Slot bytes -> value, for slots cut out by a fixed-length reader
    pub fn decode_slot(&self, slot: &[u8]) -> Result<Value> {
        let value = self.byte_type()?.decode_bytes(slot)?;
        self.apply_decoders(value)
    }

    /// Value -> slot bytes of `declared_size` length
    pub fn encode_slot(&self, value: Value) -> Result<Vec<u8>> {
        let value = self.apply_encoders(value)?;
        self.byte_type()?.encode_bytes(&value)
    }

    fn apply_decoders(&self, mut value: Value) -> Result<Value> {
        for converter in &self.converters {
            value = converter
                .decode(value)
                .map_err(|e| CodecError::field_format(&self.name, e))?;
        }
        Ok(value)
    }

    fn apply_encoders(&self, mut value: Value) -> Result<Value> {
        for converter in self.converters.iter().rev() {
            value = converter
                .encode(value)
                .map_err(|e| CodecError::field_format(&self.name, e))?;
        }
        Ok(value)
    }

    fn character_type(&self) -> Result<&dyn CharacterDataType> {
        self.data_type.as_character().ok_or_else(|| {
            CodecError::Layout(format!(
                "{}: data type {} cannot be used in a character stream",
                self.name,
                self.data_type.type_name()
            ))
        })
    }

    fn byte_type(&self) -> Result<&dyn ByteDataType> {
        self.data_type.as_bytes().ok_or_else(|| {
            CodecError::Layout(format!(
                "{}: data type {} has no fixed byte width",
                self.name,
                self.data_type.type_name()
            ))
        })
    }
}

/// Builder for FieldDefinition
pub struct FieldBuilder {
    field: FieldDefinition,
}

impl FieldBuilder {
    pub fn position(mut self, position: usize) -> Self {
        self.field.position = position;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.field.required = required;
        self
    }

    /// Declare an array field with inclusive bounds
    pub fn array(mut self, min: usize, max: usize) -> Self {
        self.field.array = Some(ArrayBounds { min, max });
        self
    }

    pub fn array_bounds(mut self, bounds: ArrayBounds) -> Self {
        self.field.array = Some(bounds);
        self
    }

    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.field.data_type = data_type;
        self
    }

    /// Append a converter; read order is append order
    pub fn converter(mut self, converter: Arc<dyn ValueConverter>) -> Self {
        self.field.converters.push(converter);
        self
    }

    pub fn build(self) -> Result<FieldDefinition> {
        let field = self.field;

        if field.name.is_empty() {
            return Err(CodecError::Layout("field name must not be empty".to_string()));
        }
        if let Some(bounds) = field.array {
            if bounds.min > bounds.max {
                return Err(CodecError::Layout(format!(
                    "{}: array min size {} exceeds max size {}",
                    field.name, bounds.min, bounds.max
                )));
            }
        }

        Ok(field)
    }
}
