//! SQLite connection implementation

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{Connection as RusqliteConnection, OpenFlags};
use sqlgen_core::{Connection, Result, SchemaIntrospection, SqlgenError, StatementResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// SQLite connection wrapper
pub struct SqliteConnection {
    conn: Arc<Mutex<RusqliteConnection>>,
    closed: AtomicBool,
}

impl SqliteConnection {
    /// Open a SQLite database, creating the file if needed
    pub fn open(path: &str) -> Result<Self> {
        tracing::info!(path = %path, "opening SQLite database");

        let conn = if path == ":memory:" {
            RusqliteConnection::open_in_memory().map_err(|e| {
                SqlgenError::Connection(format!("Failed to open in-memory database: {}", e))
            })?
        } else {
            let expanded_path = Self::expand_path(path)?;
            let file_path = std::path::Path::new(&expanded_path);
            if let Some(parent) = file_path.parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                return Err(SqlgenError::Connection(format!(
                    "Parent directory does not exist: {}",
                    parent.display()
                )));
            }

            let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX;

            RusqliteConnection::open_with_flags(&expanded_path, flags).map_err(|e| {
                SqlgenError::Connection(format!(
                    "Failed to open SQLite database at '{}': {}",
                    expanded_path, e
                ))
            })?
        };

        // Generated foreign keys must be checked by the engine
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| SqlgenError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        tracing::info!(path = %path, "SQLite database connection established");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            closed: AtomicBool::new(false),
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    /// Expand `~/` to the home directory
    fn expand_path(path: &str) -> Result<String> {
        if let Some(rest) = path.strip_prefix("~/") {
            let home = std::env::var_os("HOME").ok_or_else(|| {
                SqlgenError::Configuration("Unable to determine HOME directory".into())
            })?;
            Ok(std::path::PathBuf::from(home)
                .join(rest)
                .to_string_lossy()
                .to_string())
        } else if path.starts_with('~') {
            Err(SqlgenError::Configuration(
                "User-specific home directories (~user) are not supported".into(),
            ))
        } else {
            Ok(path.to_string())
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(SqlgenError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl Connection for SqliteConnection {
    fn driver_name(&self) -> &str {
        "sqlite"
    }

    #[tracing::instrument(skip(self, sql), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    async fn execute(&self, sql: &str) -> Result<StatementResult> {
        self.ensure_open()?;
        let conn = self.conn.lock();

        let rows_affected = conn
            .execute(sql, [])
            .map_err(|e| SqlgenError::Query(format!("Failed to execute statement: {}", e)))?;

        tracing::debug!(affected_rows = rows_affected, "statement executed");
        Ok(StatementResult::new(rows_affected as u64))
    }

    async fn close(&self) -> Result<()> {
        tracing::info!("closing SQLite connection");
        self.closed.store(true, Ordering::Release);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn as_schema_introspection(&self) -> Option<&dyn SchemaIntrospection> {
        Some(self)
    }
}

#[async_trait]
impl SchemaIntrospection for SqliteConnection {
    #[tracing::instrument(skip(self))]
    async fn list_tables(&self) -> Result<Vec<String>> {
        self.ensure_open()?;
        tracing::debug!("listing tables from sqlite_master");
        let conn = self.conn.lock();

        let mut stmt = conn
            .prepare(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            )
            .map_err(|e| SqlgenError::Query(format!("Failed to prepare query: {}", e)))?;

        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| SqlgenError::Query(format!("Failed to list tables: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| SqlgenError::Query(format!("Failed to read table name: {}", e)))?;

        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_execute_and_list_tables() {
        let conn = SqliteConnection::open_in_memory().expect("open in-memory database");

        conn.execute("CREATE TABLE zeta (id BIGINT NOT NULL,\n    PRIMARY KEY (id));")
            .await
            .expect("create zeta");
        conn.execute("CREATE TABLE alpha (id BIGINT);")
            .await
            .expect("create alpha");

        let tables = conn.list_tables().await.unwrap();
        assert_eq!(tables, vec!["alpha".to_string(), "zeta".to_string()]);
    }

    #[tokio::test]
    async fn test_rejected_statement_is_query_error() {
        let conn = SqliteConnection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE t (id BIGINT);").await.unwrap();

        let err = conn
            .execute("CREATE TABLE t (id BIGINT);")
            .await
            .expect_err("duplicate table must fail");

        assert!(matches!(err, SqlgenError::Query(ref msg) if msg.contains("already exists")));
    }

    #[tokio::test]
    async fn test_closed_connection_refuses_statements() {
        let conn = SqliteConnection::open_in_memory().unwrap();
        conn.close().await.unwrap();

        assert!(conn.is_closed());
        assert!(matches!(
            conn.execute("CREATE TABLE t (id BIGINT);").await,
            Err(SqlgenError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_open_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.db");

        let conn = SqliteConnection::open(path.to_str().unwrap()).unwrap();
        conn.execute("CREATE TABLE t (id BIGINT);").await.unwrap();

        assert!(path.exists());
        assert!(conn.table_exists("T").await.unwrap());
    }

    #[test]
    fn test_open_missing_parent_directory() {
        let result = SqliteConnection::open("/nonexistent-sqlgen-dir/preview.db");
        assert!(matches!(result, Err(SqlgenError::Connection(_))));
    }
}
