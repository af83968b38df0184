//! Error types for sqlgen drivers

use thiserror::Error;

/// Core error type raised by SQL executors
#[derive(Error, Debug)]
pub enum SqlgenError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection closed")]
    Closed,
}

/// Result type alias for executor operations
pub type Result<T> = std::result::Result<T, SqlgenError>;
