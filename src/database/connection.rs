//! The SQLite handle behind the document store.
//!
//! One file holds every collection: the `documents` table keys each JSON
//! body by collection slug and owner. Opening a [`Database`] always brings
//! that schema up to [`migrations::CURRENT_SCHEMA_VERSION`].

use rusqlite::Connection;
use std::path::Path;

use super::migrations;

/// A migrated connection to the document database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens or creates the library file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        Self::migrated(Connection::open(path)?)
    }

    /// A private library that vanishes on drop; used by tests.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::migrated(Connection::open_in_memory()?)
    }

    fn migrated(conn: Connection) -> Result<Self, rusqlite::Error> {
        migrations::run_all(&conn)?;
        Ok(Self { conn })
    }

    /// The connection the document store runs its queries on.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
