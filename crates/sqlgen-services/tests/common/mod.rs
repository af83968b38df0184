//! Common test utilities and mocks

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use sqlgen_core::{Connection, Result, SchemaIntrospection, SqlgenError, StatementResult};
use sqlgen_designer::{Field, Relationship, Schema, Table};

/// Mock connection for testing the coordinator without a real database.
///
/// Tracks the set of tables by reading `CREATE TABLE <name>` and
/// `DROP TABLE IF EXISTS <name>` statements, and rejects any statement
/// containing one of the configured failure patterns.
pub struct MockConnection {
    pub driver: String,
    /// Statements containing any of these patterns fail
    pub fail_on: Vec<String>,
    /// Log of every statement submitted, including rejected ones
    pub statement_log: Arc<Mutex<Vec<String>>>,
    pub tables: Arc<Mutex<Vec<String>>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            driver: "mock".to_string(),
            fail_on: Vec::new(),
            statement_log: Arc::new(Mutex::new(Vec::new())),
            tables: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a table that exists before the run
    pub fn with_table(self, name: impl Into<String>) -> Self {
        self.tables.lock().push(name.into());
        self
    }

    /// Reject statements containing the given SQL pattern
    pub fn failing_on(mut self, sql_contains: impl Into<String>) -> Self {
        self.fail_on.push(sql_contains.into());
        self
    }

    pub fn statement_log(&self) -> Vec<String> {
        self.statement_log.lock().clone()
    }

    pub fn tables(&self) -> Vec<String> {
        let mut tables = self.tables.lock().clone();
        tables.sort();
        tables
    }
}

fn table_name_after<'s>(sql: &'s str, prefix: &str) -> Option<&'s str> {
    let rest = sql.strip_prefix(prefix)?;
    rest.split(|c: char| c.is_whitespace() || c == '(' || c == ';')
        .next()
}

#[async_trait]
impl Connection for MockConnection {
    fn driver_name(&self) -> &str {
        &self.driver
    }

    async fn execute(&self, sql: &str) -> Result<StatementResult> {
        self.statement_log.lock().push(sql.to_string());

        if let Some(pattern) = self.fail_on.iter().find(|p| sql.contains(p.as_str())) {
            return Err(SqlgenError::Query(format!("mock rejected statement matching '{}'", pattern)));
        }

        let mut tables = self.tables.lock();
        if let Some(name) = table_name_after(sql, "CREATE TABLE ") {
            if tables.iter().any(|t| t.eq_ignore_ascii_case(name)) {
                return Err(SqlgenError::Query(format!("table {} already exists", name)));
            }
            tables.push(name.to_string());
        } else if let Some(name) = table_name_after(sql, "DROP TABLE IF EXISTS ") {
            tables.retain(|t| !t.eq_ignore_ascii_case(name));
        }

        Ok(StatementResult::new(0))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    fn is_closed(&self) -> bool {
        false
    }

    fn as_schema_introspection(&self) -> Option<&dyn SchemaIntrospection> {
        Some(self)
    }
}

#[async_trait]
impl SchemaIntrospection for MockConnection {
    async fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self.tables())
    }
}

pub fn id_field() -> Field {
    Field::named("id").bigint().primary_key()
}

/// Two tables linked many-to-many, plus a one-to-many publisher link
pub fn library_schema() -> Schema {
    Schema::new()
        .with_table(
            Table::new("t1", "author")
                .with_field(id_field())
                .with_field(Field::named("name").varchar(255).not_null()),
        )
        .with_table(
            Table::new("t2", "Book")
                .with_field(id_field())
                .with_field(Field::named("title").varchar(255).not_null()),
        )
        .with_table(Table::new("t3", "Publisher").with_field(id_field()))
        .with_relationship(Relationship::one_to_many("r1", "Book", "Publisher"))
        .with_relationship(Relationship::many_to_many("r2", "Book", "author"))
}
