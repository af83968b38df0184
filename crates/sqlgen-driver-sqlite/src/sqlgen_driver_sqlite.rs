//! SQLite executor implementation

mod connection;

pub use connection::SqliteConnection;
