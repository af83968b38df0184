//! Derived schema produced by relationship resolution
//!
//! Resolution never edits the caller's [`Schema`](super::Schema). Declared
//! tables are copied into [`ResolvedTable`]s and every relationship-derived
//! column, constraint and join table is added to the copies.

use super::{Field, ForeignKeyDesign, Table};

/// Where a resolved column came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnOrigin {
    Declared,
    /// Synthesized for the relationship with this id
    Relationship(String),
}

/// Where a resolved table came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOrigin {
    /// Declared by the caller with this id
    Declared(String),
    /// Join table synthesized for the many-to-many relationship with this id
    JoinTable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub name: String,
    pub data_type: String,
    pub primary_key: bool,
    pub auto_increment: bool,
    /// Uniqueness requested by the caller
    pub unique: bool,
    /// Uniqueness implied by a one-to-one relationship
    pub derived_unique: bool,
    pub nullable: bool,
    pub origin: ColumnOrigin,
}

impl ResolvedColumn {
    pub fn from_field(field: &Field) -> Self {
        Self {
            name: field.name.clone(),
            data_type: field.data_type.clone(),
            primary_key: field.primary_key,
            auto_increment: field.auto_increment,
            unique: field.unique,
            derived_unique: false,
            nullable: field.nullable,
            origin: ColumnOrigin::Declared,
        }
    }

    /// A nullable foreign-key column added for a relationship
    pub fn link(
        name: impl Into<String>,
        data_type: impl Into<String>,
        relationship: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            primary_key: false,
            auto_increment: false,
            unique: false,
            derived_unique: false,
            nullable: true,
            origin: ColumnOrigin::Relationship(relationship.into()),
        }
    }

    pub fn is_unique(&self) -> bool {
        self.unique || self.derived_unique
    }

    pub fn is_declared(&self) -> bool {
        self.origin == ColumnOrigin::Declared
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTable {
    pub name: String,
    pub origin: TableOrigin,
    pub columns: Vec<ResolvedColumn>,
    /// Multi-column UNIQUE constraints
    pub unique_constraints: Vec<Vec<String>>,
    pub foreign_keys: Vec<ForeignKeyDesign>,
}

impl ResolvedTable {
    /// Copy a declared table
    pub fn from_table(table: &Table) -> Self {
        Self {
            name: table.name.clone(),
            origin: TableOrigin::Declared(table.id.clone()),
            columns: table.fields.iter().map(ResolvedColumn::from_field).collect(),
            unique_constraints: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&ResolvedColumn> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut ResolvedColumn> {
        self.columns
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Get primary key column names in declaration order
    pub fn primary_key_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn is_join_table(&self) -> bool {
        matches!(self.origin, TableOrigin::JoinTable(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSchema {
    /// Declared tables in declaration order
    pub tables: Vec<ResolvedTable>,
    /// Distinct join tables in first-encountered order
    pub join_tables: Vec<ResolvedTable>,
}

impl ResolvedSchema {
    /// Find a declared or join table by exact name
    pub fn table(&self, name: &str) -> Option<&ResolvedTable> {
        self.tables
            .iter()
            .chain(self.join_tables.iter())
            .find(|t| t.name == name)
    }
}
