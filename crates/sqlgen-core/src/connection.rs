//! Connection traits for the SQL executor collaborator

use crate::{Result, StatementResult};
use async_trait::async_trait;

/// A database connection that accepts one statement at a time.
///
/// The generator has no access to result sets; a statement either succeeds
/// or the driver returns an error describing why it was rejected.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Get the driver name (e.g., "sqlite")
    fn driver_name(&self) -> &str;

    /// Execute a single DDL statement
    async fn execute(&self, sql: &str) -> Result<StatementResult>;

    /// Close the connection
    async fn close(&self) -> Result<()>;

    /// Check if the connection is closed
    fn is_closed(&self) -> bool;

    /// Get schema introspection interface if supported
    fn as_schema_introspection(&self) -> Option<&dyn SchemaIntrospection> {
        None
    }
}

/// Read-only view of the objects present in the target namespace
#[async_trait]
pub trait SchemaIntrospection: Send + Sync {
    /// List user table names, sorted by name
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Check whether a table exists (case-insensitive, like SQL identifiers)
    async fn table_exists(&self, name: &str) -> Result<bool> {
        let tables = self.list_tables().await?;
        tracing::trace!(table = %name, known = tables.len(), "checking table existence");
        Ok(tables.iter().any(|t| t.eq_ignore_ascii_case(name)))
    }
}
