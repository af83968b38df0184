//! sqlgen Core - executor abstractions shared by the generator crates
//!
//! This crate defines the boundary between DDL synthesis and the database
//! that runs it:
//!
//! - `Connection` - submits one statement at a time and reports success or failure
//! - `SchemaIntrospection` - lists the tables currently present in the target
//! - `SqlgenError` - the failure type every driver reports

mod connection;
mod error;
mod types;

pub use connection::*;
pub use error::*;
pub use types::*;
