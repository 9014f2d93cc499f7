//! Connection bootstrap utilities for SQLite.
//!
//! # Invariants
//! - Returned connections have a busy timeout configured.
//! - Returned connections have migrations fully applied.
//! - Bootstrap errors name the database they came from.

use super::migrations::{apply_migrations, SchemaError};
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const IN_MEMORY_TARGET: &str = ":memory:";

pub type DbResult<T> = Result<T, DbError>;

/// SQLite failure, tagged with the database it concerns when known.
#[derive(Debug)]
pub enum DbError {
    /// The file could not be opened or configured.
    Open {
        target: String,
        source: rusqlite::Error,
    },
    /// The schema could not be migrated.
    Schema { target: String, source: SchemaError },
    /// A statement failed on an already-open connection.
    Sqlite(rusqlite::Error),
}

impl DbError {
    /// Returns `(found, supported)` when the file has a newer schema.
    pub fn schema_too_new(&self) -> Option<(u32, u32)> {
        match self {
            Self::Schema {
                source: SchemaError::TooNew { found, supported },
                ..
            } => Some((*found, *supported)),
            _ => None,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => write!(f, "cannot open `{target}`: {source}"),
            Self::Schema { target, source } => write!(f, "`{target}`: {source}"),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Schema { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Opens (or creates) a memopad database file and applies pending migrations.
///
/// # Side effects
/// - Emits `db_open` events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with(path.display().to_string(), || Connection::open(path))
}

/// Opens a private in-memory database with migrations applied.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with(IN_MEMORY_TARGET.to_string(), Connection::open_in_memory)
}

fn open_with(
    target: String,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start target={target}");

    let result = connect()
        .and_then(|conn| conn.busy_timeout(BUSY_TIMEOUT).map(|()| conn))
        .map_err(|source| DbError::Open {
            target: target.clone(),
            source,
        })
        .and_then(|mut conn| match apply_migrations(&mut conn) {
            Ok(_) => Ok(conn),
            Err(source) => Err(DbError::Schema {
                target: target.clone(),
                source,
            }),
        });

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok target={target} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error target={target} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    result
}
