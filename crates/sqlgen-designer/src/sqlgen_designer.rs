//! Schema designer for sqlgen
//!
//! Turns an abstract schema description into SQL DDL.
//!
//! ## Pipeline
//!
//! - [`SchemaValidator`] rejects reserved or malformed names and dangling references
//! - [`RelationshipResolver`] derives foreign-key columns and join tables into a
//!   [`ResolvedSchema`] without touching the caller's [`Schema`]
//! - [`DdlGenerator`] renders the resolved schema as an ordered [`DdlScript`]
//!
//! ## Usage
//!
//! ```rust
//! use sqlgen_designer::{Field, Relationship, ResolverOptions, Schema, Table, compile};
//!
//! let schema = Schema::new()
//!     .with_table(Table::new("t1", "Author").with_field(Field::named("id").bigint().primary_key()))
//!     .with_table(Table::new("t2", "Book").with_field(Field::named("id").bigint().primary_key()))
//!     .with_relationship(Relationship::many_to_many("r1", "Book", "Author"));
//!
//! let script = compile(&schema, ResolverOptions::default()).unwrap();
//! assert!(script.render().contains("CREATE TABLE Author_Book"));
//! ```

pub mod error;
pub mod models;
pub mod service;

pub use error::{DesignError, NameScope, SchemaError, ValidationErrors};
pub use models::{
    Cardinality, ColumnOrigin, Endpoint, Field, ForeignKeyDesign, Relationship,
    RelationshipKind, ResolvedColumn, ResolvedSchema, ResolvedTable, Schema, Table, TableOrigin,
    TableRef,
};
pub use service::{
    DdlGenerator, DdlScript, DdlStatement, ManyToManyPairing, RESERVED_KEYWORDS,
    RelationshipResolver, ResolverOptions, SchemaValidator, StatementKind, compile,
    is_reserved_keyword, join_table_name,
};
