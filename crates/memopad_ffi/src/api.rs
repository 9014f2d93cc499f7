//! FFI use-case API for the Flutter memo board.
//!
//! # Responsibility
//! - Expose memo add/update/delete/clear/list as sync, use-case-level calls.
//! - Translate core results into flat response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call opens the store fresh, so it observes the latest persisted
//!   list.
//! - Unknown font names fall back to the default font, as on load.

use log::error;
use memopad_core::db::open_db;
use memopad_core::{
    core_version as core_version_inner, filtered_view, init_logging as init_logging_inner,
    ping as ping_inner, KeyValueMemoRepository, Memo, MemoFont, MemoId, MemoStore, SortOrder,
    SqliteKeyValueStore, StoreResult, UpdateOutcome, ViewQuery,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const STORE_DB_FILE_NAME: &str = "memopad.sqlite3";
const STORE_DB_PATH_ENV: &str = "MEMOPAD_DB_PATH";
static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

type EntryStore<'conn> = MemoStore<KeyValueMemoRepository<SqliteKeyValueStore<'conn>>>;

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Exposes the core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the SQLite file used by every later memo call.
///
/// # FFI contract
/// - Must run before the first memo call to take effect.
/// - Repeating the same path is accepted; a different path is rejected.
/// - Returns an empty string on success and the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "store path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = STORE_DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "store path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// One memo card as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoItem {
    pub id: String,
    pub text: String,
    /// RFC 3339 UTC timestamp.
    pub created_at: String,
    /// Font wire name (`sans|serif|mono|handwriting`).
    pub font: String,
}

/// Result envelope for mutating calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoActionResponse {
    /// Whether the call completed; no-ops still count as success.
    pub ok: bool,
    /// Affected memo id, when there is one.
    pub memo_id: Option<String>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl MemoActionResponse {
    fn success(message: impl Into<String>, memo_id: Option<String>) -> Self {
        Self {
            ok: true,
            memo_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            memo_id: None,
            message: message.into(),
        }
    }
}

/// Result envelope for `memo_list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoListResponse {
    pub ok: bool,
    /// Display-ordered memos (empty on failure).
    pub items: Vec<MemoItem>,
    pub message: String,
}

/// Adds a memo. Blank text succeeds without creating anything.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_add(text: String, font: Option<String>) -> MemoActionResponse {
    let font = parse_font(font);
    match with_store(|store| store.add(text, font)) {
        Ok(Some(id)) => MemoActionResponse::success("Memo added.", Some(id.to_string())),
        Ok(None) => MemoActionResponse::success("Nothing to add.", None),
        Err(err) => MemoActionResponse::failure(format!("memo_add failed: {err}")),
    }
}

/// Replaces memo text (and font when given). Blank text deletes the memo.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_update(id: String, text: String, font: Option<String>) -> MemoActionResponse {
    let Some(memo_id) = MemoId::parse(id) else {
        return MemoActionResponse::success("Memo not found.", None);
    };
    let font = parse_font(font);
    let response_id = Some(memo_id.to_string());
    match with_store(|store| store.update(&memo_id, text, font)) {
        Ok(UpdateOutcome::Updated) => MemoActionResponse::success("Memo updated.", response_id),
        Ok(UpdateOutcome::Deleted) => MemoActionResponse::success("Memo deleted.", response_id),
        Ok(UpdateOutcome::NotFound) => MemoActionResponse::success("Memo not found.", None),
        Err(err) => MemoActionResponse::failure(format!("memo_update failed: {err}")),
    }
}

/// Deletes one memo. Unknown ids succeed without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_delete(id: String) -> MemoActionResponse {
    let Some(memo_id) = MemoId::parse(id) else {
        return MemoActionResponse::success("Memo not found.", None);
    };
    match with_store(|store| store.delete(&memo_id)) {
        Ok(true) => MemoActionResponse::success("Memo deleted.", Some(memo_id.to_string())),
        Ok(false) => MemoActionResponse::success("Memo not found.", None),
        Err(err) => MemoActionResponse::failure(format!("memo_delete failed: {err}")),
    }
}

/// Removes every memo. Confirmation is the caller's job.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_clear_all() -> MemoActionResponse {
    match with_store(|store| store.clear_all()) {
        Ok(removed) => MemoActionResponse::success(format!("Cleared {removed} memo(s)."), None),
        Err(err) => MemoActionResponse::failure(format!("memo_clear_all failed: {err}")),
    }
}

/// Lists memos for display.
///
/// `order` is `newest|oldest` (default `newest`); `filter` is a
/// case-insensitive substring match on text.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_list(order: Option<String>, filter: Option<String>) -> MemoListResponse {
    let order = match order.as_deref().map(str::trim).filter(|value| !value.is_empty()) {
        None => SortOrder::default(),
        Some(value) => match SortOrder::parse(value) {
            Some(order) => order,
            None => {
                return MemoListResponse {
                    ok: false,
                    items: Vec::new(),
                    message: format!("unsupported order `{value}`; expected newest|oldest"),
                };
            }
        },
    };
    let query = ViewQuery {
        order,
        text_filter: filter,
        font: None,
    };

    match with_store(|store| {
        Ok(filtered_view(store.memos(), &query)
            .into_iter()
            .map(to_memo_item)
            .collect::<Vec<_>>())
    }) {
        Ok(items) => {
            let message = if items.is_empty() {
                "No memos yet. Add one!".to_string()
            } else {
                format!("{} memo(s).", items.len())
            };
            MemoListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => MemoListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("memo_list failed: {err}"),
        },
    }
}

/// Font wire names in menu order.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_fonts() -> Vec<String> {
    MemoFont::ALL
        .iter()
        .map(|font| font.as_str().to_string())
        .collect()
}

fn parse_font(font: Option<String>) -> Option<MemoFont> {
    font.map(|value| MemoFont::parse_or_default(Some(value.as_str())))
}

fn resolve_store_db_path() -> PathBuf {
    STORE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(STORE_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_DB_FILE_NAME)
        })
        .clone()
}

fn with_store<T>(f: impl FnOnce(&mut EntryStore<'_>) -> StoreResult<T>) -> Result<T, String> {
    let db_path = resolve_store_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        error!(
            "event=ffi_store_open module=ffi status=error path={} error={err}",
            db_path.display()
        );
        format!("memo DB open failed: {err}")
    })?;
    let repo = KeyValueMemoRepository::new(SqliteKeyValueStore::new(&conn));
    let mut store = MemoStore::try_open(repo).map_err(|err| err.to_string())?;
    f(&mut store).map_err(|err| err.to_string())
}

fn to_memo_item(memo: &Memo) -> MemoItem {
    MemoItem {
        id: memo.id.to_string(),
        text: memo.text.clone(),
        created_at: memo.created_at_rfc3339(),
        font: memo.font.as_str().to_string(),
    }
}
