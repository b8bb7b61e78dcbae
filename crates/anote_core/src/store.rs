//! Key-value persistence boundary.
//!
//! # Responsibility
//! - Define the get/put contract the session uses to load and save snapshots.
//! - Provide in-memory and SQLite-backed implementations.
//!
//! # Invariants
//! - A missing key is `Ok(None)`, never an error.
//! - `put` replaces the whole value in one statement; there is no partial
//!   write path.

use crate::db::{open_db, open_db_in_memory};
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage backend failure.
#[derive(Debug)]
pub enum StoreError {
    /// SQLite rejected an open, migration or statement.
    Sqlite(rusqlite::Error),
    /// The preferences file was written by a newer build.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "preferences store failure: {err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "preferences schema version {found} is newer than supported {supported}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Flat string store addressed by key.
pub trait KeyValueStore {
    /// Reads the value under `key`, if any.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Writes `value` under `key`, replacing any previous value.
    fn put(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Reads `key`, falling back to `default` when it is absent.
    fn get_or(&self, key: &str, default: impl Into<String>) -> StoreResult<String>
    where
        Self: Sized,
    {
        Ok(self.get(key)?.unwrap_or_else(|| default.into()))
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: &str) -> StoreResult<()> {
        (**self).put(key, value)
    }
}

/// Process-local store; contents vanish with the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// SQLite-backed store over a single `preferences` table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the store file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1;",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        debug!(
            "event=store_get module=store status=ok key={} found={}",
            key,
            value.is_some()
        );
        Ok(value)
    }

    fn put(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.conn
            .execute(
                "INSERT INTO preferences (key, value, updated_at)
                 VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key, value],
            )
            .map_err(|err| {
                error!("event=store_put module=store status=error key={key} error={err}");
                err
            })?;
        debug!(
            "event=store_put module=store status=ok key={} bytes={}",
            key,
            value.len()
        );
        Ok(())
    }
}
