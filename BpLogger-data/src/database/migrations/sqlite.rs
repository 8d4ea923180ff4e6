use rusqlite::Connection;
use tracing::{debug, info};

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    info!("Running SQLite migrations");

    create_entries_table(conn)?;
    create_entries_index(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the entries table
fn create_entries_table(conn: &Connection) -> Result<(), String> {
    debug!("Creating bp_entries table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS bp_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_name TEXT,
            dob TEXT,
            comment TEXT,
            timestamp TEXT NOT NULL,
            systolic1 INTEGER NOT NULL,
            diastolic1 INTEGER NOT NULL,
            systolic2 INTEGER NOT NULL,
            diastolic2 INTEGER NOT NULL
        )",
        [],
    ).map_err(|e| e.to_string())?;

    Ok(())
}

/// Create index on timestamp for ordered and ranged reads
fn create_entries_index(conn: &Connection) -> Result<(), String> {
    debug!("Creating index on timestamp");

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_bp_entries_timestamp
        ON bp_entries (timestamp)",
        [],
    ).map_err(|e| format!("Failed to create index: {}", e))?;

    Ok(())
}
