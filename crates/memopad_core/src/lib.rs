//! Core state and persistence logic for Memopad.
//! This crate is the single source of truth for memo invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::memo::{Memo, MemoFont, MemoId};
pub use repo::memo_repo::{
    decode_memos, encode_memos, DecodedMemos, KeyValueMemoRepository, MemoRepository, RepoError,
    RepoResult, DEFAULT_MEMO_KEY,
};
pub use service::memo_store::{
    MemoChange, MemoObserver, MemoStore, StoreError, StoreResult, SubscriptionId, UpdateOutcome,
};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};
pub use view::projection::{filtered_view, sorted_view, MemoProjection, SortOrder, ViewQuery};
pub use view::summary::{summarize_text, SUMMARY_DEFAULT_CHARS};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
