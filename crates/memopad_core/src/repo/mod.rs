//! Memo persistence port and its implementations.
//!
//! # Responsibility
//! - Define the load/save contract the store writes through.
//! - Own the stored JSON shape and the load-time legacy migration.
//!
//! # Invariants
//! - `load` reports read failures; only a missing key or unparsable payload
//!   loads as an empty list.
//! - `save` always writes the full list; there are no incremental writes.

pub mod memo_repo;
