//! Schema migration registry for the slot database.
//!
//! # Responsibility
//! - Hold every schema migration in version order.
//! - Bring an opened database up to the newest version atomically.
//!
//! # Invariants
//! - Registry versions are strictly increasing.
//! - `PRAGMA user_version` always names the last applied migration.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

struct Migration {
    version: u32,
    sql: &'static str,
}

const REGISTRY: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_slots.sql"),
}];

/// Newest schema version this build can produce.
pub fn latest_version() -> u32 {
    REGISTRY.last().map_or(0, |migration| migration.version)
}

/// Applies every migration newer than the database's stamped version.
///
/// A database stamped above [`latest_version`] is refused rather than
/// downgraded.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let installed = stamped_version(conn)?;
    let supported = latest_version();
    if installed > supported {
        return Err(DbError::SchemaTooNew {
            found: installed,
            supported,
        });
    }
    if installed == supported {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in REGISTRY
        .iter()
        .filter(|migration| migration.version > installed)
    {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;
    Ok(())
}

fn stamped_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
