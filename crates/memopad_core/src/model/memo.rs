//! Memo record, identity and font tag.
//!
//! # Invariants
//! - `id` and `created_at` never change after construction.
//! - `font` is a display hint only; it never affects identity or ordering.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque memo identifier.
///
/// Newly created memos get UUID v4 strings, but any non-empty string read
/// from storage is accepted so older payloads keep their identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoId(String);

impl MemoId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an existing identifier. Returns `None` for blank input.
    pub fn parse(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for MemoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display font selector attached to a memo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoFont {
    #[default]
    Sans,
    Serif,
    Mono,
    Handwriting,
}

impl MemoFont {
    /// Every selectable font, in menu order.
    pub const ALL: [MemoFont; 4] = [Self::Sans, Self::Serif, Self::Mono, Self::Handwriting];

    /// Stable wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sans => "sans",
            Self::Serif => "serif",
            Self::Mono => "mono",
            Self::Handwriting => "handwriting",
        }
    }

    /// Parses a wire name, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sans" => Some(Self::Sans),
            "serif" => Some(Self::Serif),
            "mono" => Some(Self::Mono),
            "handwriting" => Some(Self::Handwriting),
            _ => None,
        }
    }

    /// Parses a wire name, falling back to the default font for absent or
    /// unrecognized values.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or_default()
    }
}

impl Display for MemoFont {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user-authored memo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memo {
    pub id: MemoId,
    /// Text exactly as submitted; only the emptiness check trims it.
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub font: MemoFont,
}

impl Memo {
    /// Creates a memo stamped with the current time.
    ///
    /// Returns `None` when `text` is empty after trimming.
    pub fn new(text: impl Into<String>, font: MemoFont) -> Option<Self> {
        Self::with_id(MemoId::generate(), text, Utc::now(), font)
    }

    /// Creates a memo with caller-provided identity and timestamp.
    ///
    /// Used by the load path where identity already exists in storage.
    pub fn with_id(
        id: MemoId,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
        font: MemoFont,
    ) -> Option<Self> {
        let text = text.into();
        if is_blank(&text) {
            return None;
        }
        Some(Self {
            id,
            text,
            created_at,
            font,
        })
    }

    /// `created_at` in the stored RFC 3339 form, e.g. `2024-01-01T00:00:00Z`.
    pub fn created_at_rfc3339(&self) -> String {
        self.created_at
            .to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

/// Returns whether `text` would be rejected as memo content.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
