//! Converter registry
//!
//! Immutable name -> implementation table, built once when layouts are loaded
//! and passed by reference to whatever resolves field definitions. Names are
//! case-insensitive.
//!
//! ## Defaults
//! - data types: `X`, `N`, `XN`, `X9`, `SX9` (nullable string),
//!   `ESN` (shift-coded double-byte), `EN` (double-byte, no shift codes)
//! - converters: `number`, `signed_number`, `replacement`, `_LITERAL_`
//! - text charsets: `UTF-8` (alias `UTF8`)

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::charset::{DoubleByteCharset, TextCharset, Utf8};
use crate::dbcs::{NoShiftCodeField, ShiftCodeField};
use crate::error::{CodecError, ConvertError, Result};
use crate::value::{Decimal, Value};

use super::converters::{CharacterReplacer, DefaultValue, NumberString, ReplacementTable, SignedNumberString};
use super::{DataType, ValueConverter};

/// Registry name of the converter applied to literal layout arguments
pub const LITERAL_CONVERTER: &str = "_LITERAL_";

/// Argument passed to a converter in a layout (`name("a", 1)` or a literal)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConverterArg {
    Text(String),
    Number(Decimal),
}

impl From<ConverterArg> for Value {
    fn from(arg: ConverterArg) -> Self {
        match arg {
            ConverterArg::Text(s) => Value::Text(s),
            ConverterArg::Number(d) => Value::Number(d),
        }
    }
}

/// Factory for a custom converter
pub type ConverterFactory =
    Arc<dyn Fn(&[ConverterArg]) -> std::result::Result<Arc<dyn ValueConverter>, ConvertError> + Send + Sync>;

/// Data type families a layout name can resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataTypeKind {
    NullableString,
    DoubleByte,
    DoubleByteNoShiftCode,
}

#[derive(Clone)]
enum ConverterKind {
    DefaultValue,
    Number,
    SignedNumber,
    Replacement,
    Custom(ConverterFactory),
}

impl fmt::Debug for ConverterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConverterKind::DefaultValue => f.write_str("DefaultValue"),
            ConverterKind::Number => f.write_str("Number"),
            ConverterKind::SignedNumber => f.write_str("SignedNumber"),
            ConverterKind::Replacement => f.write_str("Replacement"),
            ConverterKind::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Resolves layout names to data types, converters and charsets
#[derive(Debug, Clone)]
pub struct ConverterRegistry {
    data_types: HashMap<String, DataTypeKind>,
    converters: HashMap<String, ConverterKind>,
    text_charsets: HashMap<String, Arc<dyn TextCharset>>,
    double_byte_charset: Option<Arc<dyn DoubleByteCharset>>,
    replacement_tables: HashMap<String, Arc<ReplacementTable>>,
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ConverterRegistry {
    /// Builder pre-populated with the default tables
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn data_type_kind(&self, name: &str) -> Option<DataTypeKind> {
        self.data_types.get(&name.to_ascii_lowercase()).copied()
    }

    /// Resolve a data type for one field
    ///
    /// Byte-slot types need a size and a registered double-byte charset.
    pub fn data_type(&self, name: &str, size: Option<usize>, field: &str, padding: char) -> Result<DataType> {
        let kind = self
            .data_type_kind(name)
            .ok_or_else(|| CodecError::Layout(format!("{}: unknown data type '{}'", field, name)))?;

        match kind {
            DataTypeKind::NullableString => Ok(DataType::nullable_string()),
            DataTypeKind::DoubleByte => {
                let size = self.require_size(name, size, field)?;
                let field = ShiftCodeField::new(field, size, self.double_byte_charset(field)?, padding)?;
                Ok(DataType::DoubleByte(field))
            }
            DataTypeKind::DoubleByteNoShiftCode => {
                let size = self.require_size(name, size, field)?;
                let field = NoShiftCodeField::new(field, size, self.double_byte_charset(field)?, padding)?;
                Ok(DataType::DoubleByteNoShiftCode(field))
            }
        }
    }

    fn require_size(&self, name: &str, size: Option<usize>, field: &str) -> Result<usize> {
        size.ok_or_else(|| CodecError::Layout(format!("{}: data type '{}' requires a size", field, name)))
    }

    fn double_byte_charset(&self, field: &str) -> Result<Arc<dyn DoubleByteCharset>> {
        self.double_byte_charset.clone().ok_or_else(|| {
            CodecError::Config(format!("{}: no double-byte charset registered", field))
        })
    }

    /// Resolve a value converter by name
    pub fn converter(&self, name: &str, args: &[ConverterArg], field: &str) -> Result<Arc<dyn ValueConverter>> {
        let kind = self
            .converters
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| CodecError::Layout(format!("{}: unknown converter '{}'", field, name)))?;

        let converter: Arc<dyn ValueConverter> = match kind {
            ConverterKind::DefaultValue => match args {
                [literal] => Arc::new(DefaultValue::new(literal.clone())),
                _ => {
                    return Err(CodecError::Layout(format!(
                        "{}: default value takes exactly one literal, got {}",
                        field,
                        args.len()
                    )))
                }
            },
            ConverterKind::Number => Arc::new(NumberString),
            ConverterKind::SignedNumber => Arc::new(SignedNumberString),
            ConverterKind::Replacement => {
                let table_name = match args {
                    [ConverterArg::Text(t)] => t,
                    _ => {
                        return Err(CodecError::Layout(format!(
                            "{}: replacement takes one table name",
                            field
                        )))
                    }
                };
                let table = self.replacement_tables.get(table_name).ok_or_else(|| {
                    CodecError::Layout(format!("{}: unknown replacement table '{}'", field, table_name))
                })?;
                Arc::new(CharacterReplacer::new(Arc::clone(table)))
            }
            ConverterKind::Custom(factory) => {
                factory(args).map_err(|e| CodecError::Layout(format!("{}: {}: {}", field, name, e)))?
            }
        };

        Ok(converter)
    }

    /// Look up a text charset by name
    pub fn text_charset(&self, name: &str) -> Result<Arc<dyn TextCharset>> {
        self.text_charsets
            .get(&name.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| CodecError::Config(format!("unsupported text encoding '{}'", name)))
    }
}

/// Builder for ConverterRegistry
pub struct RegistryBuilder {
    registry: ConverterRegistry,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        let mut data_types = HashMap::new();
        for name in ["x", "n", "xn", "x9", "sx9"] {
            data_types.insert(name.to_string(), DataTypeKind::NullableString);
        }
        data_types.insert("esn".to_string(), DataTypeKind::DoubleByte);
        data_types.insert("en".to_string(), DataTypeKind::DoubleByteNoShiftCode);

        let mut converters = HashMap::new();
        converters.insert(LITERAL_CONVERTER.to_ascii_lowercase(), ConverterKind::DefaultValue);
        converters.insert("number".to_string(), ConverterKind::Number);
        converters.insert("signed_number".to_string(), ConverterKind::SignedNumber);
        converters.insert("replacement".to_string(), ConverterKind::Replacement);

        let utf8: Arc<dyn TextCharset> = Arc::new(Utf8);
        let mut text_charsets = HashMap::new();
        text_charsets.insert("utf-8".to_string(), Arc::clone(&utf8));
        text_charsets.insert("utf8".to_string(), utf8);

        Self {
            registry: ConverterRegistry {
                data_types,
                converters,
                text_charsets,
                double_byte_charset: None,
                replacement_tables: HashMap::new(),
            },
        }
    }
}

impl RegistryBuilder {
    /// Register a data type name
    pub fn data_type(mut self, name: &str, kind: DataTypeKind) -> Self {
        self.registry.data_types.insert(name.to_ascii_lowercase(), kind);
        self
    }

    /// Register a custom converter factory
    pub fn converter<F>(mut self, name: &str, factory: F) -> Self
    where
        F: Fn(&[ConverterArg]) -> std::result::Result<Arc<dyn ValueConverter>, ConvertError> + Send + Sync + 'static,
    {
        self.registry
            .converters
            .insert(name.to_ascii_lowercase(), ConverterKind::Custom(Arc::new(factory)));
        self
    }

    /// Register a text charset under its own name
    pub fn text_charset(mut self, charset: Arc<dyn TextCharset>) -> Self {
        self.registry
            .text_charsets
            .insert(charset.name().to_ascii_lowercase(), charset);
        self
    }

    /// Set the charset used by `ESN` / `EN` fields
    pub fn double_byte_charset(mut self, charset: Arc<dyn DoubleByteCharset>) -> Self {
        self.registry.double_byte_charset = Some(charset);
        self
    }

    /// Register a replacement table for the `replacement` converter
    pub fn replacement_table(mut self, table: ReplacementTable) -> Self {
        self.registry
            .replacement_tables
            .insert(table.name().to_string(), Arc::new(table));
        self
    }

    pub fn build(self) -> ConverterRegistry {
        self.registry
    }
}
