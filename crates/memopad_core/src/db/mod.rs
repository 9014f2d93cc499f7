//! SQLite bootstrap for the durable key-value backend.
//!
//! `open` hands out connections that are already migrated; `migrations`
//! owns the ordered schema scripts behind them.

pub mod migrations;
mod open;

pub use migrations::SchemaError;
pub use open::{open_db, open_db_in_memory, DbError, DbResult};
