//! Display projections over the memo list.
//!
//! # Responsibility
//! - Derive sorted and filtered display sequences without mutating memos.
//! - Provide text helpers for compact renderers.
//!
//! # Invariants
//! - Projections borrow memos; they never clone or reorder the store list.
//! - Sorting is stable, so equal timestamps keep list order.

pub mod projection;
pub mod summary;
