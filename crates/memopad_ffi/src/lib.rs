//! Flutter-facing bindings for the memopad core.

pub mod api;
