//! Record values
//!
//! A [`Record`] maps field names to either a single [`Value`] or, for array
//! fields, an ordered list of string elements.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConvertError;

// =============================================================================
// Decimal
// =============================================================================

/// Decimal number kept in its canonical text form
///
/// Canonical form: optional `-`, integer digits without leading zeros
/// (a lone `0` is kept), optional `.` followed by the fraction digits as given.
/// Negative zero is normalized to zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    text: String,
}

impl Decimal {
    /// Parse a decimal, rejecting a sign unless `allow_sign` is set
    pub fn parse(input: &str, allow_sign: bool) -> Result<Self, ConvertError> {
        let invalid = || ConvertError::new(format!("invalid number format. value=[{}]", input));

        let (negative, unsigned) = match input.as_bytes().first() {
            Some(b'-') if allow_sign => (true, &input[1..]),
            Some(b'+') if allow_sign => (false, &input[1..]),
            _ => (false, input),
        };

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (unsigned, None),
        };

        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) {
            return Err(invalid());
        }
        if let Some(frac) = frac_part {
            if !all_digits(frac) {
                return Err(invalid());
            }
        }

        let int_trimmed = int_part.trim_start_matches('0');
        let int_canonical = if int_trimmed.is_empty() { "0" } else { int_trimmed };

        let is_zero = int_canonical == "0" && frac_part.map_or(true, |f| f.bytes().all(|b| b == b'0'));

        let mut text = String::with_capacity(input.len());
        if negative && !is_zero {
            text.push('-');
        }
        text.push_str(int_canonical);
        if let Some(frac) = frac_part {
            text.push('.');
            text.push_str(frac);
        }

        Ok(Self { text })
    }

    pub fn is_negative(&self) -> bool {
        self.text.starts_with('-')
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

/// Accepts decimal strings and plain numbers
struct DecimalVisitor;

impl<'de> Visitor<'de> for DecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal number or decimal string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Decimal, E> {
        Decimal::parse(v, true).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Decimal, E> {
        self.visit_str(&v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Decimal, E> {
        self.visit_str(&v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Decimal, E> {
        if !v.is_finite() {
            return Err(E::custom(format!("invalid number format. value=[{}]", v)));
        }
        // Display never uses exponent notation
        self.visit_str(&v.to_string())
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }
}

// =============================================================================
// Value
// =============================================================================

/// A decoded field value
///
/// Numbers serialize as strings, so a JSON round trip yields `Text`; the
/// number converters accept both on write. Bare JSON numbers read as `Number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Text(String),
    Number(Decimal),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// String form used for array storage and text encoding (None for null)
    pub fn into_text(self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Text(s) => Some(s),
            Value::Number(d) => Some(d.text),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Null => None,
            Value::Text(s) => Some(s),
            Value::Number(d) => Some(d.as_str()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Number(d)
    }
}

impl From<Option<String>> for Value {
    fn from(s: Option<String>) -> Self {
        s.map_or(Value::Null, Value::Text)
    }
}

// =============================================================================
// Record
// =============================================================================

/// Value stored for one field of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Elements of an array field; `None` is a null element
    Array(Vec<Option<String>>),

    /// Value of a non-array field
    Scalar(Value),
}

/// One decoded record: field name -> value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a scalar field
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), FieldValue::Scalar(value.into()));
    }

    /// Set an array field
    pub fn insert_array<I, S>(&mut self, name: impl Into<String>, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = items.into_iter().map(|s| Some(s.into())).collect();
        self.fields.insert(name.into(), FieldValue::Array(items));
    }

    pub fn insert_field(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// Builder-style scalar insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder-style array insert
    pub fn with_array<I, S>(mut self, name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert_array(name, items);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Scalar value of a field, if the field holds one
    pub fn scalar(&self, name: &str) -> Option<&Value> {
        match self.fields.get(name) {
            Some(FieldValue::Scalar(v)) => Some(v),
            _ => None,
        }
    }

    /// Elements of an array field, if the field holds an array
    pub fn array(&self, name: &str) -> Option<&[Option<String>]> {
        match self.fields.get(name) {
            Some(FieldValue::Array(items)) => Some(items),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}
