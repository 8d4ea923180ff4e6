use thiserror::Error;

// Database modules
pub mod connection;
pub mod migrations;

// Re-export database connection types
pub use connection::*;

/// Database error enum
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error
    #[error("SQLite connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Config(String),

    /// Migration error
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Filesystem error while preparing the database location
    #[error("Database location error: {0}")]
    Io(#[from] std::io::Error),
}
