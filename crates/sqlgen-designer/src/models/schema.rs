//! Schema model

use serde::{Deserialize, Serialize};

use super::{Relationship, Table, TableRef};

/// A complete schema description, built once per request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a table
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Builder: add a relationship
    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// Resolve a table reference to its declaration index and table.
    ///
    /// Ids match exactly. Names match exactly first, then ASCII
    /// case-insensitively, since the database treats them that way.
    pub fn find_table(&self, reference: &TableRef) -> Option<(usize, &Table)> {
        match reference {
            TableRef::Id(id) => self.tables.iter().enumerate().find(|(_, t)| &t.id == id),
            TableRef::Name(name) => self
                .tables
                .iter()
                .enumerate()
                .find(|(_, t)| &t.name == name)
                .or_else(|| {
                    self.tables
                        .iter()
                        .enumerate()
                        .find(|(_, t)| t.name.eq_ignore_ascii_case(name))
                }),
        }
    }
}
