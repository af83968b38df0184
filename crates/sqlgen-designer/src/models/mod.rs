//! Models for schema design
//!
//! The caller-supplied description ([`Schema`], [`Table`], [`Field`],
//! [`Relationship`]) and the derived view the resolver produces from it
//! ([`ResolvedSchema`]).

mod field;
mod foreign_key_design;
mod relationship;
mod resolved;
mod schema;
mod table;

pub use field::Field;
pub use foreign_key_design::ForeignKeyDesign;
pub use relationship::{Cardinality, Endpoint, Relationship, RelationshipKind, TableRef};
pub use resolved::{ColumnOrigin, ResolvedColumn, ResolvedSchema, ResolvedTable, TableOrigin};
pub use schema::Schema;
pub use table::Table;
