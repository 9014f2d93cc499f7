//! Ordered schema scripts and the runner that applies them.
//!
//! # Invariants
//! - Script `n` in `SCRIPTS` brings the schema to version `n + 1`.
//! - The applied version lives in `PRAGMA user_version`.
//! - Scripts are append-only; shipped scripts never change.

use log::info;
use rusqlite::{Connection, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const SCRIPTS: &[&str] = &[include_str!("0001_kv_entries.sql")];

/// Why a schema could not be brought up to date.
#[derive(Debug)]
pub enum SchemaError {
    /// The file was written by a newer memopad.
    TooNew { found: u32, supported: u32 },
    Sqlite(rusqlite::Error),
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooNew { found, supported } => write!(
                f,
                "schema version {found} is newer than supported {supported}"
            ),
            Self::Sqlite(err) => write!(f, "migration failed: {err}"),
        }
    }
}

impl Error for SchemaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TooNew { .. } => None,
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for SchemaError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Schema version this binary writes.
pub fn latest_version() -> u32 {
    SCRIPTS.len() as u32
}

/// Reads the applied schema version.
pub fn schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

/// Runs every script above the applied version in one immediate transaction.
///
/// Returns the version the schema was at before the call.
pub fn apply_migrations(conn: &mut Connection) -> Result<u32, SchemaError> {
    let supported = latest_version();
    let found = schema_version(conn)?;
    if found > supported {
        return Err(SchemaError::TooNew { found, supported });
    }
    if found == supported {
        return Ok(found);
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    for (script, version) in SCRIPTS.iter().zip(1_u32..).skip(found as usize) {
        tx.execute_batch(script)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={found} to_version={supported}");
    Ok(found)
}
