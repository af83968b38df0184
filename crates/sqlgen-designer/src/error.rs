//! Error types for schema validation and relationship resolution

use std::fmt;
use thiserror::Error;

use crate::models::TableRef;

/// Which kind of identifier an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameScope {
    Table,
    Field,
}

impl fmt::Display for NameScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameScope::Table => f.write_str("Table"),
            NameScope::Field => f.write_str("Field"),
        }
    }
}

/// A problem with a schema description, found before any SQL is produced
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("{scope} name '{name}' is a reserved keyword.")]
    NameConflict { name: String, scope: NameScope },

    #[error("{scope} name '{name}' is not a valid SQL identifier.")]
    InvalidIdentifier { name: String, scope: NameScope },

    #[error("Table name '{0}' is declared more than once.")]
    DuplicateTable(String),

    #[error("Table id '{0}' is declared more than once.")]
    DuplicateTableId(String),

    #[error("Table '{0}' declares no fields.")]
    EmptyTable(String),

    #[error("Table '{table}' declares field '{field}' more than once.")]
    DuplicateField { table: String, field: String },

    #[error("Field '{table}.{field}' has an invalid type '{data_type}'.")]
    InvalidFieldType {
        table: String,
        field: String,
        data_type: String,
    },

    #[error("Relationship '{relationship}' references unknown table {reference}.")]
    UnknownTable {
        relationship: String,
        reference: TableRef,
    },

    #[error("Table '{table}' has no primary key, required by relationship '{relationship}'.")]
    MissingPrimaryKey { table: String, relationship: String },

    #[error(
        "Many-to-many relationship '{relationship}' from '{source_table}' to '{target_table}' has no inverse declaration."
    )]
    MissingInverseRelationship {
        relationship: String,
        source_table: String,
        target_table: String,
    },

    #[error("One-to-many relationship '{relationship}' does not identify a single \"many\" side.")]
    AmbiguousCardinality { relationship: String },

    #[error("Many-to-many relationship '{relationship}' links table '{table}' to itself.")]
    SelfReferentialManyToMany { relationship: String, table: String },

    #[error(
        "Relationship '{relationship}' needs column '{column}' on table '{table}', which another relationship already added."
    )]
    ColumnConflict {
        relationship: String,
        table: String,
        column: String,
    },

    #[error("Join table '{name}' for relationship '{relationship}' clashes with another table.")]
    JoinTableConflict { name: String, relationship: String },

    #[error(
        "Relationship '{relationship}' links through '{table}.{column}' of type '{declared}', but the referenced key is '{expected}'."
    )]
    LinkTypeMismatch {
        relationship: String,
        table: String,
        column: String,
        declared: String,
        expected: String,
    },
}

/// Every issue found by one validation run, in discovery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<SchemaError>);

impl ValidationErrors {
    /// Wrap a list of issues; `None` when the list is empty
    pub fn from_vec(errors: Vec<SchemaError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    /// The first issue found
    pub fn first(&self) -> &SchemaError {
        &self.0[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<SchemaError> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Failure of the pure validate → resolve → render pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DesignError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    Resolution(SchemaError),
}
