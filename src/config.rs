//! Configuration for formcodec
//!
//! Centralized configuration with sensible defaults.

/// Codec-wide configuration shared by readers, writers and the layout parser
#[derive(Debug, Clone)]
pub struct CodecConfig {
    // -------------------------------------------------------------------------
    // Text Configuration
    // -------------------------------------------------------------------------
    /// Charset name used when a layout does not declare `text-encoding`
    pub text_encoding: String,

    // -------------------------------------------------------------------------
    // Double-Byte Field Configuration
    // -------------------------------------------------------------------------
    /// Character used to pad unused space in double-byte slots
    pub double_byte_padding: char,

    // -------------------------------------------------------------------------
    // Record Limits
    // -------------------------------------------------------------------------
    /// Max size of one keyed record read from a stream (in bytes)
    pub max_record_bytes: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            text_encoding: "UTF-8".to_string(),
            double_byte_padding: '\u{3000}', // ideographic space
            max_record_bytes: 16 * 1024 * 1024, // 16 MB
        }
    }
}

impl CodecConfig {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for CodecConfig
#[derive(Default)]
pub struct ConfigBuilder {
    config: CodecConfig,
}

impl ConfigBuilder {
    /// Set the default text encoding
    pub fn text_encoding(mut self, name: impl Into<String>) -> Self {
        self.config.text_encoding = name.into();
        self
    }

    /// Set the double-byte padding character
    pub fn double_byte_padding(mut self, pad: char) -> Self {
        self.config.double_byte_padding = pad;
        self
    }

    /// Set the maximum keyed record size (in bytes)
    pub fn max_record_bytes(mut self, limit: usize) -> Self {
        self.config.max_record_bytes = limit;
        self
    }

    pub fn build(self) -> CodecConfig {
        self.config
    }
}
