//! # formcodec
//!
//! Schema-driven record codec with:
//! - `application/x-www-form-urlencoded` keyed records (repeated keys, arrays)
//! - Per-field conversion pipelines (data type + value converters)
//! - Fixed-width double-byte fields delimited by shift-out / shift-in codes
//! - Layout files resolved through an explicit converter registry
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Layout (format definition)                  │
//! │              resolved via ConverterRegistry                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    RecordDefinition                          │
//! │         FieldDefinition = DataType + ValueConverters         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌───────────────┐
//!   │  keyvalue   │          │     dbcs      │
//!   │ (a=1&b=2)   │          │ (SO .. SI)    │
//!   └─────────────┘          └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod value;
pub mod charset;
pub mod percent;
pub mod dbcs;
pub mod convert;
pub mod schema;
pub mod keyvalue;
pub mod layout;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CodecError, ConvertError, Result};
pub use config::CodecConfig;
pub use convert::ConverterRegistry;
pub use layout::{FileType, LayoutDefinition};
pub use schema::{FieldDefinition, RecordDefinition};
pub use value::{Decimal, FieldValue, Record, Value};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of formcodec
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
