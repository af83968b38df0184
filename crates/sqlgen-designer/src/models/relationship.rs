//! Relationship model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of link between two tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    OneToOne,
    OneToMany,
    ManyToMany,
}

impl RelationshipKind {
    pub fn name(&self) -> &'static str {
        match self {
            RelationshipKind::OneToOne => "one-to-one",
            RelationshipKind::OneToMany => "one-to-many",
            RelationshipKind::ManyToMany => "many-to-many",
        }
    }
}

/// Per-endpoint multiplicity marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    One,
    Many,
}

/// One side of a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Source,
    Target,
}

/// Reference to a declared table, either by id or by name
///
/// Serialized as `{"id": "..."}` or `{"name": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableRef {
    Id(String),
    Name(String),
}

impl TableRef {
    pub fn id(id: impl Into<String>) -> Self {
        TableRef::Id(id.into())
    }

    pub fn name(name: impl Into<String>) -> Self {
        TableRef::Name(name.into())
    }
}

impl From<&str> for TableRef {
    fn from(name: &str) -> Self {
        TableRef::Name(name.to_string())
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableRef::Id(id) => write!(f, "with id '{}'", id),
            TableRef::Name(name) => write!(f, "'{}'", name),
        }
    }
}

/// A declared relationship between two tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RelationshipKind,
    pub source_table: TableRef,
    pub target_table: TableRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_cardinality: Option<Cardinality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_cardinality: Option<Cardinality>,
    /// Name of the link column on the owning table. Only applies when the
    /// referenced primary key is a single column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
}

impl Relationship {
    pub fn new(
        id: impl Into<String>,
        kind: RelationshipKind,
        source: impl Into<TableRef>,
        target: impl Into<TableRef>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            source_table: source.into(),
            target_table: target.into(),
            source_cardinality: None,
            target_cardinality: None,
            field_name: None,
        }
    }

    pub fn one_to_one(
        id: impl Into<String>,
        source: impl Into<TableRef>,
        target: impl Into<TableRef>,
    ) -> Self {
        Self::new(id, RelationshipKind::OneToOne, source, target)
    }

    pub fn one_to_many(
        id: impl Into<String>,
        source: impl Into<TableRef>,
        target: impl Into<TableRef>,
    ) -> Self {
        Self::new(id, RelationshipKind::OneToMany, source, target)
    }

    pub fn many_to_many(
        id: impl Into<String>,
        source: impl Into<TableRef>,
        target: impl Into<TableRef>,
    ) -> Self {
        Self::new(id, RelationshipKind::ManyToMany, source, target)
    }

    /// Builder: set both cardinality markers
    pub fn with_cardinality(mut self, source: Cardinality, target: Cardinality) -> Self {
        self.source_cardinality = Some(source);
        self.target_cardinality = Some(target);
        self
    }

    /// Builder: name the link column
    pub fn via_field(mut self, name: impl Into<String>) -> Self {
        self.field_name = Some(name.into());
        self
    }

    pub fn endpoint(&self, endpoint: Endpoint) -> &TableRef {
        match endpoint {
            Endpoint::Source => &self.source_table,
            Endpoint::Target => &self.target_table,
        }
    }

    /// Which endpoint is the "many" side of a one-to-many relationship.
    ///
    /// Unmarked relationships treat the source as "many". Returns `None` when
    /// both ends carry the same marker.
    pub fn many_endpoint(&self) -> Option<Endpoint> {
        use Cardinality::*;
        match (self.source_cardinality, self.target_cardinality) {
            (None, None) | (Some(Many), Some(One)) | (Some(Many), None) | (None, Some(One)) => {
                Some(Endpoint::Source)
            }
            (Some(One), Some(Many)) | (None, Some(Many)) | (Some(One), None) => {
                Some(Endpoint::Target)
            }
            (Some(One), Some(One)) | (Some(Many), Some(Many)) => None,
        }
    }
}
