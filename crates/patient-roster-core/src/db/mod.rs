//! SQLite store for local mode.
//!
//! One table, `patients`, holds the full record set. Rows are read back in
//! rowid order, which is the order records were first saved in.

mod patients;
mod schema;

pub use schema::{SCHEMA, SCHEMA_VERSION};

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database schema version {found} is newer than supported version {supported}")]
    UnsupportedSchema { found: i32, supported: i32 },
}

pub type DbResult<T> = Result<T, DbError>;

/// The patient store. Owns its connection.
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Open (or create) a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();
        let db = Self {
            conn: Connection::open(path)?,
            path: Some(path.to_path_buf()),
        };
        db.migrate()?;
        tracing::debug!(path = %path.display(), "opened roster database");
        Ok(db)
    }

    /// A private store that disappears with this value.
    pub fn open_in_memory() -> DbResult<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        db.migrate()?;
        Ok(db)
    }

    /// File backing the store, `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Bring an empty or older file up to [`SCHEMA_VERSION`].
    fn migrate(&self) -> DbResult<()> {
        let found: i32 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if found > SCHEMA_VERSION {
            return Err(DbError::UnsupportedSchema {
                found,
                supported: SCHEMA_VERSION,
            });
        }
        if found < SCHEMA_VERSION {
            self.conn.execute_batch(SCHEMA)?;
            self.conn
                .pragma_update(None, "user_version", SCHEMA_VERSION)?;
            tracing::debug!(from = found, to = SCHEMA_VERSION, "migrated roster schema");
        }
        Ok(())
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn transaction(&mut self) -> DbResult<rusqlite::Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }
}
