//! Layout Module
//!
//! Loads record definitions from format-definition text.
//!
//! ## Layout File
//! ```text
//! file-type:     "FormUrlEncoded"
//! text-encoding: "UTF-8"
//! [data]
//! 1 key1 [0..1] X "defval"
//! 2 key2 X number
//! ```
//!
//! Directives come first, then a single `[record]` section with one field per
//! line. Names resolve through a [`ConverterRegistry`].

mod parser;

use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use crate::charset::TextCharset;
use crate::config::CodecConfig;
use crate::convert::ConverterRegistry;
use crate::error::{CodecError, Result};
use crate::keyvalue::{RecordReader, RecordWriter};
use crate::schema::RecordDefinition;

/// Record format a layout describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// `application/x-www-form-urlencoded` keyed records
    FormUrlEncoded,
    /// Fixed-length records split by an outer reader
    Fixed,
}

impl FileType {
    fn from_directive(value: &str) -> Result<Self> {
        match value {
            "FormUrlEncoded" => Ok(FileType::FormUrlEncoded),
            "Fixed" => Ok(FileType::Fixed),
            other => Err(CodecError::Layout(format!("unsupported file-type '{}'", other))),
        }
    }
}

/// A parsed layout: directives plus its record definition
#[derive(Debug, Clone)]
pub struct LayoutDefinition {
    file_type: FileType,
    text_encoding: String,
    directives: BTreeMap<String, String>,
    record: Arc<RecordDefinition>,
    /// Resolved for keyed layouts only
    charset: Option<Arc<dyn TextCharset>>,
}

impl LayoutDefinition {
    // =========================================================================
    // Directive Names
    // =========================================================================
    const FILE_TYPE: &'static str = "file-type";
    const TEXT_ENCODING: &'static str = "text-encoding";
    const RECORD_LENGTH: &'static str = "record-length";

    /// Parse layout text
    pub fn parse(text: &str, registry: &ConverterRegistry, config: &CodecConfig) -> Result<Self> {
        let parsed = parser::parse(text, registry, config.double_byte_padding)?;

        let file_type = parsed
            .directives
            .get(Self::FILE_TYPE)
            .ok_or_else(|| CodecError::Layout(format!("directive '{}' is required", Self::FILE_TYPE)))
            .and_then(|v| FileType::from_directive(v))?;

        let text_encoding = parsed
            .directives
            .get(Self::TEXT_ENCODING)
            .cloned()
            .unwrap_or_else(|| config.text_encoding.clone());

        let record_name = parsed
            .record_name
            .ok_or_else(|| CodecError::Layout("layout has no record section".to_string()))?;
        if parsed.fields.is_empty() {
            return Err(CodecError::Layout(format!("record [{}] has no fields", record_name)));
        }

        let record = RecordDefinition::new(record_name, parsed.fields)?;

        let charset = match file_type {
            FileType::FormUrlEncoded => {
                for field in record.fields() {
                    if field.data_type().as_character().is_none() {
                        return Err(CodecError::Layout(format!(
                            "{}: data type {} is not allowed in a FormUrlEncoded layout",
                            field.name(),
                            field.data_type().type_name()
                        )));
                    }
                }
                Some(registry.text_charset(&text_encoding)?)
            }
            FileType::Fixed => {
                Self::check_record_length(&parsed.directives, &record)?;
                None
            }
        };

        tracing::debug!(
            "Loaded layout [{}]: {:?}, {} field(s), encoding {}",
            record.name(),
            file_type,
            record.len(),
            text_encoding
        );

        Ok(Self {
            file_type,
            text_encoding,
            directives: parsed.directives,
            record: Arc::new(record),
            charset,
        })
    }

    /// Read and parse a layout file
    pub fn from_path(path: &Path, registry: &ConverterRegistry, config: &CodecConfig) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text, registry, config)
    }

    /// Byte-slot fields must fit inside `record-length`
    fn check_record_length(directives: &BTreeMap<String, String>, record: &RecordDefinition) -> Result<()> {
        let Some(length) = directives.get(Self::RECORD_LENGTH) else {
            return Ok(());
        };
        let length: usize = length
            .parse()
            .map_err(|_| CodecError::Layout(format!("invalid {} '{}'", Self::RECORD_LENGTH, length)))?;

        for field in record.fields() {
            if let Some(size) = field.declared_size() {
                let end = field.position().saturating_sub(1) + size;
                if end > length {
                    return Err(CodecError::Layout(format!(
                        "{}: slot ends at byte {} beyond record length {}",
                        field.name(),
                        end,
                        length
                    )));
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn text_encoding(&self) -> &str {
        &self.text_encoding
    }

    pub fn directive(&self, name: &str) -> Option<&str> {
        self.directives.get(name).map(String::as_str)
    }

    pub fn record(&self) -> &Arc<RecordDefinition> {
        &self.record
    }

    /// Charset of a keyed layout
    pub fn charset(&self) -> Result<Arc<dyn TextCharset>> {
        self.charset.clone().ok_or_else(|| {
            CodecError::Config(format!(
                "layout [{}] is not a FormUrlEncoded layout",
                self.record.name()
            ))
        })
    }

    // =========================================================================
    // Readers / Writers
    // =========================================================================

    /// Keyed record reader over `source`
    pub fn reader<R: Read>(&self, source: R, config: &CodecConfig) -> Result<RecordReader<R>> {
        Ok(RecordReader::with_config(
            source,
            Arc::clone(&self.record),
            self.charset()?,
            config,
        ))
    }

    /// Keyed record writer over `sink`
    pub fn writer<W: Write>(&self, sink: W) -> Result<RecordWriter<W>> {
        Ok(RecordWriter::new(sink, Arc::clone(&self.record), self.charset()?))
    }
}
