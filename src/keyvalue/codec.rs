//! Keyed record codec
//!
//! Encoding and decoding functions for form-urlencoded records.
//!
//! ## Wire Format
//! ```text
//! name=value&name=value&name=value ...
//! ```
//! - `&` separates pairs, `=` separates a key from its value
//! - on read both act as one delimiter set; tokens alternate key, value
//! - a key may repeat; array fields collect every occurrence in order
//! - values are percent-encoded in the record's charset; keys are verbatim
//!
//! ## Read Path
//! ```text
//! bytes ──► text ──► RawMultiMap ──► per-field pipeline ──► Record
//! ```

use std::collections::HashMap;
use std::io::{Read, Write};

use crate::charset::TextCharset;
use crate::error::{CodecError, Result};
use crate::percent;
use crate::schema::{FieldDefinition, RecordDefinition};
use crate::value::{FieldValue, Record, Value};

/// Separator between `name=value` pairs
pub const FIELD_SEPARATOR: char = '&';

/// Separator between a key and its value
pub const KEY_VALUE_SEPARATOR: char = '=';

/// Raw values per key, in encounter order
pub type RawMultiMap = HashMap<String, Vec<String>>;

// =============================================================================
// Decoding
// =============================================================================

/// Split record text into its raw key/value multimap
///
/// `&` and `=` are interchangeable delimiters: tokens are taken in order and
/// paired as `(key, value)`. A key left without a value at the end of the
/// text gets `""`.
///
/// ```text
/// a=x=y     -> a: ["x"], y: [""]
/// a&b=1     -> a: ["b"], 1: [""]
/// a=1&&b=2  -> a: ["1"], "": ["b"], 2: [""]
/// ```
pub fn parse_parameters(text: &str, charset: &dyn TextCharset) -> Result<RawMultiMap> {
    let mut params = RawMultiMap::new();

    for pair in scan_tokens(text).chunks(2) {
        let key = pair[0];
        let raw = pair.get(1).copied().unwrap_or("");
        let value = percent::decode(raw, charset)
            .map_err(|e| CodecError::Encoding(format!("key {}: {}", key, e)))?;

        params.entry(key.to_string()).or_default().push(value);
    }

    Ok(params)
}

/// Tokens between `&` / `=` delimiters
///
/// One delimiter is consumed before each token, so two adjacent delimiters
/// yield an empty token while a single leading or trailing one yields none.
fn scan_tokens(text: &str) -> Vec<&str> {
    let is_delimiter = |c: char| c == FIELD_SEPARATOR || c == KEY_VALUE_SEPARATOR;

    let mut tokens = Vec::new();
    let mut rest = text;
    loop {
        if rest.starts_with(is_delimiter) {
            rest = &rest[1..];
        }
        if rest.is_empty() {
            break;
        }

        let end = rest.find(is_delimiter).unwrap_or(rest.len());
        tokens.push(&rest[..end]);
        rest = &rest[end..];
    }

    tokens
}

/// Decode one record from its bytes
///
/// Fails as a whole: no partial record is returned.
pub fn decode_record(bytes: &[u8], schema: &RecordDefinition, charset: &dyn TextCharset) -> Result<Record> {
    let text = charset
        .decode(bytes)
        .map_err(|e| CodecError::Encoding(e.to_string()))?;
    let params = parse_parameters(strip_line_terminator(&text), charset)?;

    for key in params.keys() {
        if schema.field(key).is_none() {
            tracing::trace!("Ignoring key '{}' not defined in record [{}]", key, schema.name());
        }
    }

    let mut record = Record::new();
    for field in schema.fields() {
        let value = decode_field(field, params.get(field.name()))?;
        record.insert_field(field.name(), value);
    }

    Ok(record)
}

/// Convert every raw value of one field and check its cardinality
fn decode_field(field: &FieldDefinition, raw: Option<&Vec<String>>) -> Result<FieldValue> {
    let name = field.name();

    let converted = match raw {
        None if field.is_required() => {
            return Err(CodecError::MissingRequiredField(name.to_string()));
        }
        None => vec![field.decode_text(None)?],
        Some(values) => values
            .iter()
            .map(|v| field.decode_text(Some(v)))
            .collect::<Result<Vec<Value>>>()?,
    };

    tracing::trace!("Decoded field {} ({} value(s))", name, converted.len());

    match field.array_bounds() {
        Some(bounds) => {
            if !bounds.contains(converted.len()) {
                return Err(CodecError::ArrayBounds {
                    field: name.to_string(),
                    count: converted.len(),
                });
            }
            Ok(FieldValue::Array(converted.into_iter().map(Value::into_text).collect()))
        }
        None => {
            if converted.len() > 1 {
                return Err(CodecError::UnexpectedMultipleValues {
                    field: name.to_string(),
                    count: converted.len(),
                });
            }
            Ok(FieldValue::Scalar(converted.into_iter().next().unwrap_or(Value::Null)))
        }
    }
}

fn strip_line_terminator(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode a record into a staging buffer
///
/// Nothing is produced unless every field encodes successfully.
pub fn encode_record(record: &Record, schema: &RecordDefinition, charset: &dyn TextCharset) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_record(&mut buffer, record, schema, charset)?;
    Ok(buffer)
}

/// Write a record to a sink and flush it
///
/// Pairs are written as they are encoded; a failing field leaves the pairs
/// before it in the sink.
pub fn write_record<W: Write>(
    sink: &mut W,
    record: &Record,
    schema: &RecordDefinition,
    charset: &dyn TextCharset,
) -> Result<()> {
    // Separator placement spans the whole record, not one field
    let mut wrote_any = false;

    for field in schema.fields() {
        let values = field_values(field, record.get(field.name()))?;

        for value in values {
            let text = match field.encode_text(value)? {
                Some(text) => text,
                None if field.is_required() => {
                    return Err(CodecError::MissingRequiredField(field.name().to_string()));
                }
                None => continue,
            };

            let encoded = percent::encode(&text, charset)
                .map_err(|e| CodecError::field_format(field.name(), e))?;

            if wrote_any {
                write_text(sink, charset, FIELD_SEPARATOR.encode_utf8(&mut [0; 4]))?;
            }
            write_text(sink, charset, field.name())?;
            write_text(sink, charset, KEY_VALUE_SEPARATOR.encode_utf8(&mut [0; 4]))?;
            write_text(sink, charset, &encoded)?;

            wrote_any = true;
        }
    }

    sink.flush()?;
    Ok(())
}

/// Normalize a record entry to a list and check its cardinality
fn field_values(field: &FieldDefinition, stored: Option<&FieldValue>) -> Result<Vec<Value>> {
    let values = match stored {
        None => vec![Value::Null],
        Some(FieldValue::Scalar(v)) => vec![v.clone()],
        Some(FieldValue::Array(items)) => items.iter().cloned().map(Value::from).collect(),
    };

    match field.array_bounds() {
        Some(bounds) if !bounds.contains(values.len()) => Err(CodecError::ArrayBounds {
            field: field.name().to_string(),
            count: values.len(),
        }),
        None if values.len() > 1 => Err(CodecError::UnexpectedMultipleValues {
            field: field.name().to_string(),
            count: values.len(),
        }),
        _ => Ok(values),
    }
}

fn write_text<W: Write>(sink: &mut W, charset: &dyn TextCharset, text: &str) -> Result<()> {
    let bytes = charset
        .encode(text)
        .map_err(|e| CodecError::Encoding(e.to_string()))?;
    sink.write_all(&bytes)?;
    Ok(())
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read the rest of a stream as one record
pub fn read_record<R: Read>(reader: &mut R, schema: &RecordDefinition, charset: &dyn TextCharset) -> Result<Record> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode_record(&bytes, schema, charset)
}
