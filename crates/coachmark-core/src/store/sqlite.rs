//! SQLite flag backend.

use std::path::Path;

use jiff::Timestamp;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use super::FlagBackend;
use crate::error::{DatabaseResultExt, Result};

/// One stored flag with its last write time.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FlagRecord {
    pub key: String,
    pub value: bool,
    pub updated_at: Timestamp,
}

/// Flags persisted in a SQLite database.
pub struct SqliteBackend {
    connection: Connection,
}

impl SqliteBackend {
    /// Opens a database file and initializes the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        let backend = Self { connection };
        backend.initialize_schema()?;
        Ok(backend)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().db_context("Failed to open in-memory database")?;
        let backend = Self { connection };
        backend.initialize_schema()?;
        Ok(backend)
    }

    fn initialize_schema(&self) -> Result<()> {
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")
    }

    /// Lists every stored flag ordered by key.
    pub fn list_flags(&self) -> Result<Vec<FlagRecord>> {
        let mut stmt = self
            .connection
            .prepare("SELECT key, value, updated_at FROM flags ORDER BY key")
            .db_context("Failed to prepare flag listing")?;

        let rows = stmt
            .query_map([], |row| {
                let updated_at: String = row.get(2)?;
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?, updated_at))
            })
            .db_context("Failed to list flags")?;

        let mut records = Vec::new();
        for row in rows {
            let (key, value, updated_at) = row.db_context("Failed to read flag row")?;
            records.push(FlagRecord {
                key,
                value: value != 0,
                updated_at: updated_at.parse().unwrap_or(Timestamp::UNIX_EPOCH),
            });
        }
        Ok(records)
    }

    /// Deletes a flag entirely. Returns whether it existed.
    pub fn delete_flag(&mut self, key: &str) -> Result<bool> {
        let removed = self
            .connection
            .execute("DELETE FROM flags WHERE key = ?1", params![key])
            .db_context("Failed to delete flag")?;
        Ok(removed > 0)
    }
}

impl FlagBackend for SqliteBackend {
    fn read_flag(&self, key: &str) -> Result<Option<bool>> {
        self.connection
            .query_row(
                "SELECT value FROM flags WHERE key = ?1",
                params![key],
                |row| row.get::<_, i64>(0),
            )
            .optional()
            .map(|value| value.map(|v| v != 0))
            .db_context("Failed to read flag")
    }

    fn write_flag(&mut self, key: &str, value: bool) -> Result<()> {
        self.connection
            .execute(
                "INSERT INTO flags (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, i64::from(value), Timestamp::now().to_string()],
            )
            .db_context("Failed to write flag")?;
        Ok(())
    }

    fn read_slot(&self, name: &str) -> Result<Option<String>> {
        self.connection
            .query_row(
                "SELECT value FROM slots WHERE name = ?1",
                params![name],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .db_context("Failed to read slot")
    }

    fn write_slot(&mut self, name: &str, value: &str) -> Result<()> {
        self.connection
            .execute(
                "INSERT INTO slots (name, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(name) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![name, value, Timestamp::now().to_string()],
            )
            .db_context("Failed to write slot")?;
        Ok(())
    }

    fn remove_slot(&mut self, name: &str) -> Result<()> {
        self.connection
            .execute("DELETE FROM slots WHERE name = ?1", params![name])
            .db_context("Failed to remove slot")?;
        Ok(())
    }
}
