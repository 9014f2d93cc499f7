//! Memo repository over a string key-value store.
//!
//! # Responsibility
//! - Encode the memo list as one JSON array under a single key.
//! - Decode stored payloads, migrating legacy records to the current model.
//!
//! # Invariants
//! - Stored records are `{id, text, createdAt, font}`; `createdAt` is
//!   RFC 3339 UTC.
//! - Decoded lists contain no blank text and no duplicate ids.
//! - Absent or unrecognized `font` values decode to `MemoFont::default()`.

use crate::model::memo::{Memo, MemoFont, MemoId};
use crate::storage::{KeyValueStore, StorageError};
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key used when the caller does not choose one.
pub const DEFAULT_MEMO_KEY: &str = "memos";

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure while reading or writing the memo list.
#[derive(Debug)]
pub enum RepoError {
    Storage(StorageError),
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode memo list: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Persistence port injected into `MemoStore`.
pub trait MemoRepository {
    /// Loads the persisted list, or an empty list when nothing usable is
    /// stored.
    ///
    /// # Errors
    /// - The backend could not be read. Callers must not treat this as an
    ///   empty list, or the next save would erase the stored memos.
    fn load(&self) -> RepoResult<Vec<Memo>>;
    /// Overwrites the persisted list with `memos`.
    fn save(&self, memos: &[Memo]) -> RepoResult<()>;
}

/// `MemoRepository` storing the list as JSON under one key.
#[derive(Debug, Clone)]
pub struct KeyValueMemoRepository<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> KeyValueMemoRepository<S> {
    /// Uses `DEFAULT_MEMO_KEY`.
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_MEMO_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the raw stored payload without decoding it.
    pub fn load_raw(&self) -> RepoResult<Option<String>> {
        Ok(self.store.get(&self.key)?)
    }
}

impl<S: KeyValueStore> MemoRepository for KeyValueMemoRepository<S> {
    fn load(&self) -> RepoResult<Vec<Memo>> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!(
                    "event=memo_load module=repo status=ok count=0 reason=missing_key key={}",
                    self.key
                );
                return Ok(Vec::new());
            }
            Err(err) => {
                error!(
                    "event=memo_load module=repo status=error error_code=read_failed key={} error={err}",
                    self.key
                );
                return Err(err.into());
            }
        };

        let decoded = decode_memos(&raw);
        if decoded.unparsable {
            warn!(
                "event=memo_load module=repo status=recovered count=0 reason=unparsable key={} bytes={}",
                self.key,
                raw.len()
            );
        } else {
            info!(
                "event=memo_load module=repo status=ok count={} dropped={} key={}",
                decoded.memos.len(),
                decoded.dropped,
                self.key
            );
        }
        Ok(decoded.memos)
    }

    fn save(&self, memos: &[Memo]) -> RepoResult<()> {
        let payload = encode_memos(memos)?;
        self.store.set(&self.key, &payload)?;
        info!(
            "event=memo_save module=repo status=ok count={} bytes={} key={}",
            memos.len(),
            payload.len(),
            self.key
        );
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredMemoOut<'a> {
    id: &'a MemoId,
    text: &'a str,
    created_at: &'a DateTime<Utc>,
    font: MemoFont,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredMemoIn {
    id: String,
    text: String,
    created_at: String,
    #[serde(default)]
    font: Option<serde_json::Value>,
}

/// Result of decoding one stored payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedMemos {
    /// Memos that survived migration, in stored order.
    pub memos: Vec<Memo>,
    /// Records skipped because they could not be migrated.
    pub dropped: usize,
    /// Whether the payload as a whole was not a JSON array.
    pub unparsable: bool,
}

/// Serializes the full list in stored order.
pub fn encode_memos(memos: &[Memo]) -> Result<String, serde_json::Error> {
    let records = memos
        .iter()
        .map(|memo| StoredMemoOut {
            id: &memo.id,
            text: memo.text.as_str(),
            created_at: &memo.created_at,
            font: memo.font,
        })
        .collect::<Vec<_>>();
    serde_json::to_string(&records)
}

/// Decodes a stored payload, applying the legacy migration per record.
pub fn decode_memos(raw: &str) -> DecodedMemos {
    let Ok(values) = serde_json::from_str::<Vec<serde_json::Value>>(raw) else {
        return DecodedMemos {
            unparsable: true,
            ..DecodedMemos::default()
        };
    };

    let mut seen = HashSet::new();
    let mut decoded = DecodedMemos::default();
    for (index, value) in values.into_iter().enumerate() {
        match migrate_record(value) {
            Ok(memo) if seen.insert(memo.id.clone()) => decoded.memos.push(memo),
            Ok(memo) => {
                warn!(
                    "event=memo_migrate module=repo status=dropped index={index} reason=duplicate_id memo_id={}",
                    memo.id
                );
                decoded.dropped += 1;
            }
            Err(reason) => {
                warn!(
                    "event=memo_migrate module=repo status=dropped index={index} reason={}",
                    reason.as_str()
                );
                decoded.dropped += 1;
            }
        }
    }
    decoded
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropReason {
    Malformed,
    BlankId,
    BlankText,
    InvalidTimestamp,
}

impl DropReason {
    fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "malformed_record",
            Self::BlankId => "blank_id",
            Self::BlankText => "blank_text",
            Self::InvalidTimestamp => "invalid_created_at",
        }
    }
}

fn migrate_record(value: serde_json::Value) -> Result<Memo, DropReason> {
    let record =
        serde_json::from_value::<StoredMemoIn>(value).map_err(|_| DropReason::Malformed)?;
    let id = MemoId::parse(record.id).ok_or(DropReason::BlankId)?;
    let created_at = DateTime::parse_from_rfc3339(record.created_at.trim())
        .map(|value| value.with_timezone(&Utc))
        .map_err(|_| DropReason::InvalidTimestamp)?;
    let font = MemoFont::parse_or_default(
        record
            .font
            .as_ref()
            .and_then(serde_json::Value::as_str),
    );
    Memo::with_id(id, record.text, created_at, font).ok_or(DropReason::BlankText)
}
