//! Error types for formcodec
//!
//! Provides a unified error type for all codec operations.

use thiserror::Error;

/// Result type alias using CodecError
pub type Result<T> = std::result::Result<T, CodecError>;

/// Failure raised by a single conversion step (value converter or charset).
///
/// The pipeline attaches the field name when it surfaces this as
/// [`CodecError::FieldFormat`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConvertError {
    message: String,
}

impl ConvertError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Unified error type for formcodec operations
#[derive(Debug, Error)]
pub enum CodecError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("{0} is required")]
    MissingRequiredField(String),

    #[error("invalid data format. field name=[{field}]: {source}")]
    FieldFormat {
        field: String,
        #[source]
        source: ConvertError,
    },

    #[error("{field} is out of range array (count {count})")]
    ArrayBounds { field: String, count: usize },

    #[error("{field} is not array but many keys (count {count})")]
    UnexpectedMultipleValues { field: String, count: usize },

    #[error("Record too large: more than {limit} bytes")]
    RecordTooLarge { limit: usize },

    #[error("Encoding error: {0}")]
    Encoding(String),

    // -------------------------------------------------------------------------
    // Double-Byte Field Errors
    // -------------------------------------------------------------------------
    #[error("cannot find shift out code. data:[{0}]")]
    MissingShiftOutCode(String),

    #[error("too many shift out code. data:[{0}]")]
    TooManyShiftOutCode(String),

    #[error("too large data. field name=[{field}] field size={declared} data size={actual}")]
    FieldTooLarge {
        field: String,
        declared: usize,
        actual: usize,
    },

    #[error("slot length mismatch. field name=[{field}] expected={expected} actual={actual}")]
    SlotLength {
        field: String,
        expected: usize,
        actual: usize,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    /// Tag a conversion failure with the field it happened in
    pub fn field_format(field: &str, source: ConvertError) -> Self {
        CodecError::FieldFormat {
            field: field.to_string(),
            source,
        }
    }

    /// Name of the field the error is about, if any
    pub fn field_name(&self) -> Option<&str> {
        match self {
            CodecError::MissingRequiredField(field) => Some(field),
            CodecError::FieldFormat { field, .. }
            | CodecError::ArrayBounds { field, .. }
            | CodecError::UnexpectedMultipleValues { field, .. }
            | CodecError::FieldTooLarge { field, .. }
            | CodecError::SlotLength { field, .. } => Some(field),
            _ => None,
        }
    }
}
