//! Built-in value converters

use std::collections::HashMap;

use crate::error::ConvertError;
use crate::value::{Decimal, Value};

use super::ValueConverter;

// =============================================================================
// Default Value
// =============================================================================

/// Substitutes a literal for null on write; reads pass through
#[derive(Debug, Clone)]
pub struct DefaultValue {
    literal: Value,
}

impl DefaultValue {
    pub fn new(literal: impl Into<Value>) -> Self {
        Self {
            literal: literal.into(),
        }
    }
}

impl ValueConverter for DefaultValue {
    fn name(&self) -> &str {
        "_LITERAL_"
    }

    fn decode(&self, value: Value) -> Result<Value, ConvertError> {
        Ok(value)
    }

    fn encode(&self, value: Value) -> Result<Value, ConvertError> {
        if value.is_null() {
            Ok(self.literal.clone())
        } else {
            Ok(value)
        }
    }
}

// =============================================================================
// Numbers
// =============================================================================

fn decode_number(value: Value, signed: bool) -> Result<Value, ConvertError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(Value::Null)
            } else {
                Ok(Value::Number(Decimal::parse(trimmed, signed)?))
            }
        }
        Value::Number(d) => check_sign(d, signed).map(Value::Number),
    }
}

fn encode_number(value: Value, signed: bool) -> Result<Value, ConvertError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Text(s) if s.trim().is_empty() => Ok(Value::Null),
        Value::Text(s) => {
            let decimal = Decimal::parse(s.trim(), signed)?;
            Ok(Value::Text(decimal.to_string()))
        }
        Value::Number(d) => check_sign(d, signed).map(|d| Value::Text(d.to_string())),
    }
}

fn check_sign(decimal: Decimal, signed: bool) -> Result<Decimal, ConvertError> {
    if !signed && decimal.is_negative() {
        return Err(ConvertError::new(format!(
            "invalid number format. unsigned number expected. value=[{}]",
            decimal
        )));
    }
    Ok(decimal)
}

/// Unsigned decimal number carried as text
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberString;

impl ValueConverter for NumberString {
    fn name(&self) -> &str {
        "number"
    }

    fn decode(&self, value: Value) -> Result<Value, ConvertError> {
        decode_number(value, false)
    }

    fn encode(&self, value: Value) -> Result<Value, ConvertError> {
        encode_number(value, false)
    }
}

/// Decimal number with an optional leading sign
#[derive(Debug, Clone, Copy, Default)]
pub struct SignedNumberString;

impl ValueConverter for SignedNumberString {
    fn name(&self) -> &str {
        "signed_number"
    }

    fn decode(&self, value: Value) -> Result<Value, ConvertError> {
        decode_number(value, true)
    }

    fn encode(&self, value: Value) -> Result<Value, ConvertError> {
        encode_number(value, true)
    }
}

// =============================================================================
// Character Replacement
// =============================================================================

/// Named character-for-character substitution table
#[derive(Debug, Clone, Default)]
pub struct ReplacementTable {
    name: String,
    map: HashMap<char, char>,
}

impl ReplacementTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            map: HashMap::new(),
        }
    }

    pub fn with(mut self, from: char, to: char) -> Self {
        self.map.insert(from, to);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, text: &str) -> String {
        text.chars()
            .map(|c| self.map.get(&c).copied().unwrap_or(c))
            .collect()
    }
}

/// Replaces characters through a [`ReplacementTable`] in both directions
#[derive(Debug, Clone)]
pub struct CharacterReplacer {
    table: std::sync::Arc<ReplacementTable>,
}

impl CharacterReplacer {
    pub fn new(table: std::sync::Arc<ReplacementTable>) -> Self {
        Self { table }
    }

    fn replace(&self, value: Value) -> Value {
        match value {
            Value::Text(s) => Value::Text(self.table.apply(&s)),
            other => other,
        }
    }
}

impl ValueConverter for CharacterReplacer {
    fn name(&self) -> &str {
        "replacement"
    }

    fn decode(&self, value: Value) -> Result<Value, ConvertError> {
        Ok(self.replace(value))
    }

    fn encode(&self, value: Value) -> Result<Value, ConvertError> {
        Ok(self.replace(value))
    }
}
