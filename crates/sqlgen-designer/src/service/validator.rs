//! Schema validation
//!
//! Runs before any resolution or rendering. Every check runs to completion so
//! a single pass reports all problems in the description.

use std::collections::HashSet;

use crate::error::{NameScope, SchemaError, ValidationErrors};
use crate::models::Schema;

/// Words that may not be used as table or field names (matched case-insensitively)
pub static RESERVED_KEYWORDS: &[&str] = &[
    "select", "insert", "delete", "update", "from", "where", "user", "group", "table", "order",
    "by", "limit", "drop",
];

pub fn is_reserved_keyword(name: &str) -> bool {
    RESERVED_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(name))
}

/// Names are rendered unquoted, so they must be plain identifiers
fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Structural and naming checks for a schema description
pub struct SchemaValidator;

impl SchemaValidator {
    /// Validate the schema, returning every issue found
    pub fn validate(schema: &Schema) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        let mut seen_names = HashSet::new();
        let mut seen_ids = HashSet::new();

        for table in &schema.tables {
            Self::check_name(&table.name, NameScope::Table, &mut errors);

            if !table.name.is_empty() && !seen_names.insert(table.name.to_lowercase()) {
                errors.push(SchemaError::DuplicateTable(table.name.clone()));
            }
            if !seen_ids.insert(table.id.as_str()) {
                errors.push(SchemaError::DuplicateTableId(table.id.clone()));
            }
            if table.fields.is_empty() {
                errors.push(SchemaError::EmptyTable(table.name.clone()));
            }

            let mut seen_fields = HashSet::new();
            for field in &table.fields {
                Self::check_name(&field.name, NameScope::Field, &mut errors);

                if !field.name.is_empty() && !seen_fields.insert(field.name.to_lowercase()) {
                    errors.push(SchemaError::DuplicateField {
                        table: table.name.clone(),
                        field: field.name.clone(),
                    });
                }

                if field.data_type.trim().is_empty() || field.data_type.contains(';') {
                    errors.push(SchemaError::InvalidFieldType {
                        table: table.name.clone(),
                        field: field.name.clone(),
                        data_type: field.data_type.clone(),
                    });
                }
            }
        }

        for relationship in &schema.relationships {
            if let Some(field_name) = &relationship.field_name {
                Self::check_name(field_name, NameScope::Field, &mut errors);
            }
            for reference in [&relationship.source_table, &relationship.target_table] {
                if schema.find_table(reference).is_none() {
                    errors.push(SchemaError::UnknownTable {
                        relationship: relationship.id.clone(),
                        reference: reference.clone(),
                    });
                }
            }
        }

        match ValidationErrors::from_vec(errors) {
            Some(errors) => {
                tracing::debug!(issues = errors.len(), "schema validation failed");
                Err(errors)
            }
            None => Ok(()),
        }
    }

    fn check_name(name: &str, scope: NameScope, errors: &mut Vec<SchemaError>) {
        if !is_plain_identifier(name) {
            errors.push(SchemaError::InvalidIdentifier {
                name: name.to_string(),
                scope,
            });
        } else if is_reserved_keyword(name) {
            errors.push(SchemaError::NameConflict {
                name: name.to_string(),
                scope,
            });
        }
    }
}
