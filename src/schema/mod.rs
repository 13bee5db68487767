//! Schema Module
//!
//! Field and record definitions. Built once (in code or from a layout) and
//! shared read-only by every reader and writer.

mod field;
mod record;

pub use field::{ArrayBounds, FieldBuilder, FieldDefinition};
pub use record::RecordDefinition;
