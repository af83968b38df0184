//! Table model

use serde::{Deserialize, Serialize};

use super::Field;

/// A table as declared by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Stable, caller-assigned identity
    pub id: String,
    /// SQL identifier, case preserved as given
    pub name: String,
    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Table {
    /// Create a table with no fields
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder: add a field
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a field the way the database would (ASCII case-insensitive)
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Get primary key fields in declaration order
    pub fn primary_key_fields(&self) -> Vec<&Field> {
        self.fields.iter().filter(|f| f.primary_key).collect()
    }
}
