//! Keyed Record Module
//!
//! Reads and writes `application/x-www-form-urlencoded` records against a
//! [`RecordDefinition`](crate::schema::RecordDefinition).
//!
//! ## Record Format
//! ```text
//! ┌────────────┬───┬────────────┬───┬────────────┐
//! │ key=value  │ & │ key=value  │ & │ key=value  │
//! └────────────┴───┴────────────┴───┴────────────┘
//! ```
//!
//! ## Field Rules
//! - required field absent on read / null on write: `MissingRequiredField`
//! - array field count outside `[min, max]`: `ArrayBounds`
//! - non-array field with several values: `UnexpectedMultipleValues`
//! - converter failure: `FieldFormat` tagged with the field name

mod codec;
mod reader;
mod writer;

pub use codec::{
    decode_record, encode_record, parse_parameters, read_record, write_record, RawMultiMap,
    FIELD_SEPARATOR, KEY_VALUE_SEPARATOR,
};
pub use reader::RecordReader;
pub use writer::RecordWriter;

/// MIME type of the keyed record format
pub const MIME_TYPE: &str = "application/x-www-form-urlencoded";
