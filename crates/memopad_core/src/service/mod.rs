//! Memo use-case services.
//!
//! # Responsibility
//! - Own the authoritative memo list and its mutation rules.
//! - Keep hosts (FFI, CLI) decoupled from storage details.

pub mod memo_store;
