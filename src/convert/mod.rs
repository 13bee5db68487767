//! Conversion Module
//!
//! Everything a field's pipeline is assembled from.
//!
//! ## Pipeline
//! ```text
//!   read:  raw ──► DataType::decode ──► conv[0] ──► conv[1] ──► Value
//!   write: Value ──► conv[1] ──► conv[0] ──► DataType::encode ──► raw
//! ```
//!
//! - [`DataType`]: wire representation of a field (closed set of variants)
//! - [`ValueConverter`]: reversible value-level transform
//! - [`ConverterRegistry`]: resolves layout names to data types and converters

use std::fmt;

use crate::error::ConvertError;
use crate::value::Value;

mod converters;
mod data_type;
mod registry;

pub use converters::{CharacterReplacer, DefaultValue, NumberString, ReplacementTable, SignedNumberString};
pub use data_type::{ByteDataType, CharacterDataType, DataType, NullableString};
pub use registry::{ConverterArg, ConverterFactory, ConverterRegistry, DataTypeKind, RegistryBuilder, LITERAL_CONVERTER};

/// A reversible transform applied to a field value after its data type
pub trait ValueConverter: fmt::Debug + Send + Sync {
    /// Name the converter is registered under
    fn name(&self) -> &str;

    /// Read direction
    fn decode(&self, value: Value) -> Result<Value, ConvertError>;

    /// Write direction
    fn encode(&self, value: Value) -> Result<Value, ConvertError>;
}
