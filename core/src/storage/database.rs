use crate::{Error, Result};
use rusqlite::Connection as SqliteConnection;
use std::path::{Path, PathBuf};

pub type Connection = SqliteConnection;

/// Database manager for the SQLite favorites backend
pub struct Database {
    db_path: PathBuf,
}

impl Database {
    /// Create a new database manager
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    /// Get a connection to the database
    pub fn connect(&self) -> Result<Connection> {
        let conn = SqliteConnection::open(&self.db_path)?;
        Ok(conn)
    }

    /// Create the database if needed and make sure the schema is in place
    pub fn get_or_create(&self) -> Result<Connection> {
        // Ensure parent directory exists
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = self.connect()?;
        initialize_schema(&conn)?;
        Ok(conn)
    }

    /// Get the current schema version
    pub fn get_schema_version(conn: &Connection) -> Result<i32> {
        let version: String = conn.query_row(
            "SELECT value FROM metadata WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )?;

        version
            .parse::<i32>()
            .map_err(|_| Error::Persistence("Invalid schema version".to_string()))
    }
}

/// Initialize the database schema. Safe to run against an existing database.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    let schema = include_str!("../../schema.sql");
    conn.execute_batch(schema)?;
    Ok(())
}
