//! Record Reader
//!
//! Reads keyed records from a byte stream.

use std::io::{BufRead, BufReader, Read};
use std::sync::Arc;

use crate::charset::TextCharset;
use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::schema::RecordDefinition;
use crate::value::Record;

use super::codec::decode_record;

/// Reads records from a stream
///
/// A form-urlencoded stream holds a single record: the first `read_record`
/// consumes the whole stream and later calls return `None`.
pub struct RecordReader<R: Read> {
    /// Source stream (buffered so the next byte can be peeked)
    source: BufReader<R>,

    /// Definition shared with other readers/writers
    schema: Arc<RecordDefinition>,

    /// Charset of the stream
    charset: Arc<dyn TextCharset>,

    /// Upper bound on the bytes of one record
    max_record_bytes: usize,

    /// Number of records read so far
    record_number: u64,
}

impl<R: Read> RecordReader<R> {
    /// Create a reader with the default configuration
    pub fn new(source: R, schema: Arc<RecordDefinition>, charset: Arc<dyn TextCharset>) -> Self {
        Self::with_config(source, schema, charset, &CodecConfig::default())
    }

    pub fn with_config(
        source: R,
        schema: Arc<RecordDefinition>,
        charset: Arc<dyn TextCharset>,
        config: &CodecConfig,
    ) -> Self {
        Self {
            source: BufReader::new(source),
            schema,
            charset,
            max_record_bytes: config.max_record_bytes,
            record_number: 0,
        }
    }

    /// Whether at least one more byte is available
    pub fn has_next(&mut self) -> Result<bool> {
        Ok(!self.source.fill_buf()?.is_empty())
    }

    /// Read the next record, or `None` once the stream is exhausted
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        if !self.has_next()? {
            return Ok(None);
        }

        self.record_number += 1;

        let limit = self.max_record_bytes;
        let mut bytes = Vec::new();
        (&mut self.source)
            .take(limit as u64 + 1)
            .read_to_end(&mut bytes)?;
        if bytes.len() > limit {
            tracing::warn!("Record {} exceeds {} bytes", self.record_number, limit);
            return Err(CodecError::RecordTooLarge { limit });
        }

        tracing::debug!(
            "Reading record {} of [{}] ({} bytes)",
            self.record_number,
            self.schema.name(),
            bytes.len()
        );

        match decode_record(&bytes, &self.schema, self.charset.as_ref()) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!("Record {} rejected: {}", self.record_number, e);
                Err(e)
            }
        }
    }

    /// Number of records read so far
    pub fn record_number(&self) -> u64 {
        self.record_number
    }

    pub fn schema(&self) -> &RecordDefinition {
        &self.schema
    }

    /// Give back the underlying stream
    pub fn into_inner(self) -> R {
        self.source.into_inner()
    }
}
