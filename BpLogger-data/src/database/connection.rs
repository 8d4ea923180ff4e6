//! Database connection module for the BP logger
//!
//! Entries live in a single SQLite database reached through an r2d2 pool.
//! The location comes from `DATABASE_URL` (a `sqlite://` URL or a plain
//! path), then `DB_SQLITE_PATH`, then a default file under `data/`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use tracing::{error, info, warn};

use super::migrations::run_sqlite_migrations;
use super::DatabaseError;

/// Default SQLite file when nothing is configured
pub const DEFAULT_SQLITE_PATH: &str = "data/bp_logger.db";

/// Where the SQLite database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqliteLocation {
    /// File-backed database
    File(PathBuf),
    /// Private in-memory database (lost on restart)
    Memory,
}

impl SqliteLocation {
    /// Parse a `DATABASE_URL` style value.
    ///
    /// Accepts `sqlite://path`, `sqlite:path`, `sqlite::memory:`, `:memory:`
    /// and bare paths. Other URL schemes are rejected.
    pub fn from_url(url: &str) -> Result<Self, DatabaseError> {
        let url = url.trim();
        let rest = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);

        if rest.is_empty() {
            return Err(DatabaseError::Config("DATABASE_URL is empty".to_string()));
        }
        if rest == ":memory:" {
            return Ok(SqliteLocation::Memory);
        }
        if rest.contains("://") {
            return Err(DatabaseError::Config(format!(
                "Unsupported database URL: {}",
                url
            )));
        }

        Ok(SqliteLocation::File(PathBuf::from(rest)))
    }
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// SQLite location
    pub location: SqliteLocation,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            location: SqliteLocation::File(PathBuf::from(DEFAULT_SQLITE_PATH)),
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a database configuration from environment variables
    pub fn from_env() -> Result<Self, DatabaseError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create a database configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DatabaseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let location = match lookup("DATABASE_URL") {
            Some(url) => SqliteLocation::from_url(&url)?,
            None => match lookup("DB_SQLITE_PATH") {
                Some(path) => SqliteLocation::File(PathBuf::from(path)),
                None => {
                    info!("No DATABASE_URL or DB_SQLITE_PATH provided, using {}", DEFAULT_SQLITE_PATH);
                    defaults.location
                }
            },
        };

        let max_connections = lookup("DB_MAX_CONNECTIONS")
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.max_connections);

        let timeout_seconds = lookup("DB_TIMEOUT_SECONDS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.timeout_seconds);

        info!(
            "Database configuration: location={:?}, max_connections={}, timeout={}s",
            location, max_connections, timeout_seconds
        );

        Ok(DatabaseConfig {
            location,
            max_connections,
            timeout_seconds,
        })
    }
}

/// Shared SQLite connection pool
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: Arc<r2d2::Pool<SqliteConnectionManager>>,
    location: SqliteLocation,
}

impl DatabasePool {
    /// Check out a connection from the pool
    pub fn get(&self) -> Result<r2d2::PooledConnection<SqliteConnectionManager>, r2d2::Error> {
        self.pool.get()
    }

    /// Run a trivial query to confirm the database answers
    pub fn ping(&self) -> Result<(), DatabaseError> {
        let conn = self.get()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    /// Human-readable description of the connection
    pub fn connection_info(&self) -> String {
        let state = self.pool.state();
        let target = match &self.location {
            SqliteLocation::File(path) => format!("SQLite database at {}", path.display()),
            SqliteLocation::Memory => "SQLite in-memory database".to_string(),
        };
        format!(
            "{} (connections: active={}, idle={})",
            target, state.connections, state.idle_connections
        )
    }
}

/// Open the connection pool described by `config` and run migrations.
///
/// When the parent directory of a file database cannot be created the pool
/// falls back to an in-memory database.
pub fn initialize_database_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    let pool = match &config.location {
        SqliteLocation::File(path) => match prepare_parent_dir(path) {
            Ok(()) => initialize_file_pool(path, config)?,
            Err(e) => {
                warn!("Failed to prepare {}: {}, falling back to in-memory database", path.display(), e);
                initialize_in_memory_pool(config)?
            }
        },
        SqliteLocation::Memory => initialize_in_memory_pool(config)?,
    };

    run_migrations(&pool)?;
    Ok(pool)
}

/// Open a migrated in-memory database (used by tests and as a fallback)
pub fn open_in_memory_pool() -> Result<DatabasePool, DatabaseError> {
    let config = DatabaseConfig {
        location: SqliteLocation::Memory,
        ..DatabaseConfig::default()
    };
    initialize_database_pool(&config)
}

fn prepare_parent_dir(path: &Path) -> Result<(), DatabaseError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating parent directory: {:?}", parent);
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn initialize_file_pool(path: &Path, config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!("Initializing SQLite database at: {}", path.display());

    let manager = SqliteConnectionManager::file(path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE);

    let pool = r2d2::Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(manager)
        .map_err(|e| {
            error!("Failed to create SQLite connection pool: {}", e);
            DatabaseError::Pool(e)
        })?;

    info!("SQLite connection pool created successfully");
    Ok(DatabasePool {
        pool: Arc::new(pool),
        location: SqliteLocation::File(path.to_path_buf()),
    })
}

/// Every in-memory connection is its own database, so the pool holds one.
fn initialize_in_memory_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!("Initializing in-memory SQLite database");

    let pool = r2d2::Pool::builder()
        .max_size(1)
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(SqliteConnectionManager::memory())?;

    Ok(DatabasePool {
        pool: Arc::new(pool),
        location: SqliteLocation::Memory,
    })
}

fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    let conn = pool.get()?;
    run_sqlite_migrations(&conn).map_err(DatabaseError::Migration)
}
