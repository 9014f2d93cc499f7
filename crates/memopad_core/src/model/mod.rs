//! Memo domain model.
//!
//! # Responsibility
//! - Define the canonical memo record shared by store, repository and views.
//!
//! # Invariants
//! - Every memo is identified by a stable `MemoId`.
//! - Stored memo text is never empty after trimming.

pub mod memo;
