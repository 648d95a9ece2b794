//! Named-slot persistence contracts and implementations.
//!
//! # Responsibility
//! - Provide a stable read/write API over durable named slots.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Slot values are opaque strings; interpretation belongs to callers.
//! - Writing an existing key replaces its value atomically.

use crate::db::{open_db, open_db_in_memory, DbError};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Slot holding the serialized quote collection.
pub const QUOTES_SLOT: &str = "quotes";

/// Slot holding the last selected category filter.
pub const LAST_CATEGORY_SLOT: &str = "lastCategory";

/// Slot holding the last randomly drawn quote.
pub const LAST_VIEWED_SLOT: &str = "lastViewedQuote";

pub type SlotResult<T> = Result<T, SlotError>;

/// Transport error for slot persistence operations.
#[derive(Debug)]
pub enum SlotError {
    Db(DbError),
    Poisoned,
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Poisoned => write!(f, "slot store lock poisoned by an earlier panic"),
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Poisoned => None,
        }
    }
}

impl From<DbError> for SlotError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage interface for durable named slots.
///
/// Implementations must be shareable across threads: the sync scheduler
/// persists from a worker thread while callers mutate from their own.
pub trait SlotStore: Send + Sync {
    /// Returns the stored value for `key`, or `None` when the slot was never
    /// written.
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()>;
}

/// SQLite-backed slot store over the `slots` table.
pub struct SqliteSlotStore {
    conn: Mutex<Connection>,
}

impl SqliteSlotStore {
    /// Wraps an already-migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens (or creates) a database file and migrates it.
    pub fn open(path: impl AsRef<Path>) -> SlotResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a migrated in-memory database.
    pub fn in_memory() -> SlotResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    fn lock(&self) -> SlotResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| SlotError::Poisoned)
    }
}

impl SlotStore for SqliteSlotStore {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT value FROM slots WHERE key = ?1;")?;
        let mut rows = stmt.query([key])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(row.get(0)?));
        }
        Ok(None)
    }

    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Ephemeral slot store holding values in process memory.
///
/// Useful for throwaway collections and as a lightweight test double; values
/// vanish when the store is dropped.
#[derive(Default)]
pub struct MemorySlotStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemorySlotStore {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>> {
        let slots = self.slots.lock().map_err(|_| SlotError::Poisoned)?;
        Ok(slots.get(key).cloned())
    }

    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        let mut slots = self.slots.lock().map_err(|_| SlotError::Poisoned)?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
