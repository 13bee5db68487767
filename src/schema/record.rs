//! Record definitions

use std::collections::HashSet;

use crate::error::{CodecError, Result};

use super::FieldDefinition;

/// Ordered, uniquely-named fields of one record type
#[derive(Debug, Clone)]
pub struct RecordDefinition {
    name: String,
    fields: Vec<FieldDefinition>,
}

impl RecordDefinition {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Result<Self> {
        let name = name.into();

        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name()) {
                return Err(CodecError::Layout(format!(
                    "record [{}]: duplicate field name '{}'",
                    name,
                    field.name()
                )));
            }
        }

        Ok(Self { name, fields })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
