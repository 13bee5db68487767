//! Record Writer
//!
//! Writes keyed records to a byte stream.

use std::io::{BufWriter, Write};
use std::sync::Arc;

use crate::charset::TextCharset;
use crate::error::{CodecError, Result};
use crate::schema::RecordDefinition;
use crate::value::Record;

use super::codec::write_record;

/// Writes records to a stream
pub struct RecordWriter<W: Write> {
    /// Destination stream (buffered, flushed after every record)
    sink: BufWriter<W>,

    schema: Arc<RecordDefinition>,

    charset: Arc<dyn TextCharset>,

    /// Number of records written so far
    record_number: u64,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(sink: W, schema: Arc<RecordDefinition>, charset: Arc<dyn TextCharset>) -> Self {
        Self {
            sink: BufWriter::new(sink),
            schema,
            charset,
            record_number: 0,
        }
    }

    /// Write one record and flush
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        self.record_number += 1;

        tracing::debug!(
            "Writing record {} of [{}]",
            self.record_number,
            self.schema.name()
        );

        write_record(&mut self.sink, record, &self.schema, self.charset.as_ref()).map_err(|e| {
            tracing::warn!("Record {} rejected: {}", self.record_number, e);
            e
        })
    }

    /// Number of records written so far
    pub fn record_number(&self) -> u64 {
        self.record_number
    }

    /// Flush and give back the underlying stream
    pub fn into_inner(self) -> Result<W> {
        self.sink
            .into_inner()
            .map_err(|e| CodecError::Io(e.into_error()))
    }
}
