//! Authoritative memo list with write-through persistence.
//!
//! # Responsibility
//! - Apply add/update/delete/clear mutations to the memo list.
//! - Persist the full list before a mutation is considered complete.
//! - Notify subscribed observers after each committed mutation.
//!
//! # Invariants
//! - No memo with blank text is ever committed.
//! - Memo ids are unique within the list.
//! - The in-memory list only changes after `MemoRepository::save` succeeds,
//!   so memory and storage never diverge.
//! - No-op mutations neither write nor notify.

use crate::model::memo::{is_blank, Memo, MemoFont, MemoId};
use crate::repo::memo_repo::{MemoRepository, RepoError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure to commit a mutation.
#[derive(Debug)]
pub enum StoreError {
    /// The list could not be written; in-memory state was left unchanged.
    Repo(RepoError),
    /// The persisted list was never read, so writing would overwrite it.
    /// Cleared by a successful `MemoStore::reload`.
    NotLoaded(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "memo write-through failed: {err}"),
            Self::NotLoaded(reason) => write!(
                f,
                "memo list was not loaded ({reason}); refusing to overwrite storage"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::NotLoaded(_) => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// What a committed mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoChange {
    Added(MemoId),
    Updated(MemoId),
    Deleted(MemoId),
    Cleared { removed: usize },
}

/// Result of `MemoStore::update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// New text was blank, so the memo was removed.
    Deleted,
    /// No memo had the given id; nothing changed.
    NotFound,
}

/// Receives the post-mutation list after every committed change.
pub trait MemoObserver {
    fn on_change(&self, change: &MemoChange, memos: &[Memo]);
}

impl<F> MemoObserver for F
where
    F: Fn(&MemoChange, &[Memo]),
{
    fn on_change(&self, change: &MemoChange, memos: &[Memo]) {
        self(change, memos)
    }
}

/// Handle returned by `MemoStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// Single source of truth for the memo list.
pub struct MemoStore<R: MemoRepository> {
    repo: R,
    memos: Vec<Memo>,
    store_id: u64,
    revision: u64,
    load_error: Option<String>,
    observers: Vec<(SubscriptionId, Box<dyn MemoObserver>)>,
    next_subscription: u64,
}

impl<R: MemoRepository> MemoStore<R> {
    /// Loads the persisted list through `repo`.
    ///
    /// A read failure still yields a store, but an empty read-only one:
    /// every mutation returns `StoreError::NotLoaded` until `reload`
    /// succeeds. Use `try_open` to surface the failure instead.
    pub fn open(repo: R) -> Self {
        let (memos, load_error) = match repo.load() {
            Ok(memos) => {
                info!("event=store_open module=store status=ok count={}", memos.len());
                (memos, None)
            }
            Err(err) => {
                error!("event=store_open module=store status=error error_code=load_failed read_only=true error={err}");
                (Vec::new(), Some(err.to_string()))
            }
        };
        Self {
            repo,
            memos,
            store_id: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
            revision: 0,
            load_error,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Loads the persisted list, failing when storage cannot be read.
    pub fn try_open(repo: R) -> StoreResult<Self> {
        let store = Self::open(repo);
        match &store.load_error {
            Some(reason) => Err(StoreError::NotLoaded(reason.clone())),
            None => Ok(store),
        }
    }

    /// Re-reads the persisted list, replacing in-memory state.
    ///
    /// Observers are not notified; the revision still advances so cached
    /// projections recompute. On failure the store keeps its list and
    /// becomes read-only.
    pub fn reload(&mut self) -> StoreResult<()> {
        match self.repo.load() {
            Ok(memos) => {
                self.memos = memos;
                self.load_error = None;
                self.revision += 1;
                info!(
                    "event=store_reload module=store status=ok count={} revision={}",
                    self.memos.len(),
                    self.revision
                );
                Ok(())
            }
            Err(err) => {
                error!("event=store_reload module=store status=error error_code=load_failed read_only=true error={err}");
                let reason = err.to_string();
                self.load_error = Some(reason.clone());
                Err(StoreError::NotLoaded(reason))
            }
        }
    }

    /// True while the last load failed; mutations are refused.
    pub fn is_read_only(&self) -> bool {
        self.load_error.is_some()
    }

    /// Message of the load failure that made the store read-only.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Identifies this store instance; unique within the process.
    pub fn store_id(&self) -> u64 {
        self.store_id
    }

    /// Current list in insertion order (newest additions first).
    pub fn memos(&self) -> &[Memo] {
        &self.memos
    }

    pub fn get(&self, id: &MemoId) -> Option<&Memo> {
        self.memos.iter().find(|memo| &memo.id == id)
    }

    pub fn len(&self) -> usize {
        self.memos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memos.is_empty()
    }

    /// Counter bumped on every committed mutation and reload.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Fonts a host may offer for new or edited memos.
    pub fn fonts(&self) -> &'static [MemoFont] {
        &MemoFont::ALL
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Adds a memo at the front of the list.
    ///
    /// Returns `Ok(None)` without writing when `text` is blank.
    pub fn add(
        &mut self,
        text: impl Into<String>,
        font: Option<MemoFont>,
    ) -> StoreResult<Option<MemoId>> {
        let Some(memo) = Memo::new(text, font.unwrap_or_default()) else {
            info!("event=memo_add module=store status=skipped reason=blank_text");
            return Ok(None);
        };
        let id = memo.id.clone();

        let mut next = Vec::with_capacity(self.memos.len() + 1);
        next.push(memo);
        next.extend(self.memos.iter().cloned());

        self.commit("memo_add", next, MemoChange::Added(id.clone()))?;
        Ok(Some(id))
    }

    /// Replaces the text (and font, when given) of the memo with `id`.
    ///
    /// Blank `text` deletes the memo instead. Unknown ids are ignored.
    pub fn update(
        &mut self,
        id: &MemoId,
        text: impl Into<String>,
        font: Option<MemoFont>,
    ) -> StoreResult<UpdateOutcome> {
        let Some(index) = self.position(id) else {
            info!("event=memo_update module=store status=skipped reason=not_found memo_id={id}");
            return Ok(UpdateOutcome::NotFound);
        };

        let text = text.into();
        if is_blank(&text) {
            self.remove_at("memo_update", index)?;
            return Ok(UpdateOutcome::Deleted);
        }

        let mut next = self.memos.clone();
        let target = &mut next[index];
        target.text = text;
        if let Some(font) = font {
            target.font = font;
        }

        self.commit("memo_update", next, MemoChange::Updated(id.clone()))?;
        Ok(UpdateOutcome::Updated)
    }

    /// Removes the memo with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: &MemoId) -> StoreResult<bool> {
        let Some(index) = self.position(id) else {
            info!("event=memo_delete module=store status=skipped reason=not_found memo_id={id}");
            return Ok(false);
        };
        self.remove_at("memo_delete", index)?;
        Ok(true)
    }

    /// Empties the list and persists the empty list, even if already empty.
    ///
    /// Returns the number of memos removed.
    pub fn clear_all(&mut self) -> StoreResult<usize> {
        let removed = self.memos.len();
        self.commit("memo_clear_all", Vec::new(), MemoChange::Cleared { removed })?;
        Ok(removed)
    }

    /// Registers an observer; it runs after every committed mutation.
    pub fn subscribe(&mut self, observer: impl MemoObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` for unknown handles.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    fn position(&self, id: &MemoId) -> Option<usize> {
        self.memos.iter().position(|memo| &memo.id == id)
    }

    fn remove_at(&mut self, event: &'static str, index: usize) -> StoreResult<()> {
        let mut next = self.memos.clone();
        let removed = next.remove(index);
        self.commit(event, next, MemoChange::Deleted(removed.id))
    }

    fn commit(
        &mut self,
        event: &'static str,
        next: Vec<Memo>,
        change: MemoChange,
    ) -> StoreResult<()> {
        if let Some(reason) = &self.load_error {
            warn!("event={event} module=store status=rejected reason=not_loaded");
            return Err(StoreError::NotLoaded(reason.clone()));
        }
        if let Err(err) = self.repo.save(&next) {
            error!("event={event} module=store status=error error_code=save_failed error={err}");
            return Err(err.into());
        }

        self.memos = next;
        self.revision += 1;
        info!(
            "event={event} module=store status=ok count={} revision={} change={}",
            self.memos.len(),
            self.revision,
            change_label(&change)
        );

        for (_, observer) in &self.observers {
            observer.on_change(&change, &self.memos);
        }
        Ok(())
    }
}

fn change_label(change: &MemoChange) -> String {
    match change {
        MemoChange::Added(id) => format!("added:{id}"),
        MemoChange::Updated(id) => format!("updated:{id}"),
        MemoChange::Deleted(id) => format!("deleted:{id}"),
        MemoChange::Cleared { removed } => format!("cleared:{removed}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoChange, MemoStore, StoreError, UpdateOutcome};
    use crate::model::memo::{Memo, MemoFont};
    use crate::repo::memo_repo::{MemoRepository, RepoError, RepoResult};
    use crate::storage::StorageError;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Repository fake that can be told to fail the next saves.
    #[derive(Default, Clone)]
    struct FlakyRepo {
        saved: Rc<RefCell<Vec<Memo>>>,
        fail: Rc<Cell<bool>>,
        fail_load: Rc<Cell<bool>>,
    }

    impl MemoRepository for FlakyRepo {
        fn load(&self) -> RepoResult<Vec<Memo>> {
            if self.fail_load.get() {
                return Err(RepoError::Storage(StorageError::InvalidKey(
                    "unreadable".to_string(),
                )));
            }
            Ok(self.saved.borrow().clone())
        }

        fn save(&self, memos: &[Memo]) -> RepoResult<()> {
            if self.fail.get() {
                return Err(RepoError::Storage(StorageError::InvalidKey(
                    "disk full".to_string(),
                )));
            }
            *self.saved.borrow_mut() = memos.to_vec();
            Ok(())
        }
    }

    #[test]
    fn failed_save_leaves_state_untouched() {
        let repo = FlakyRepo::default();
        let mut store = MemoStore::open(repo.clone());
        let id = store.add("keep me", None).unwrap().unwrap();
        let revision = store.revision();

        repo.fail.set(true);
        assert!(store.add("lost", None).is_err());
        assert!(store.update(&id, "changed", None).is_err());
        assert!(store.delete(&id).is_err());
        assert!(store.clear_all().is_err());

        assert_eq!(store.len(), 1);
        assert_eq!(store.memos()[0].text, "keep me");
        assert_eq!(store.revision(), revision);
        assert_eq!(repo.saved.borrow().as_slice(), store.memos());
    }

    #[test]
    fn update_keeps_position_and_font_when_not_given() {
        let mut store = MemoStore::open(FlakyRepo::default());
        let first = store.add("first", Some(MemoFont::Serif)).unwrap().unwrap();
        store.add("second", None).unwrap();

        let outcome = store.update(&first, "first edited", None).unwrap();
        assert_eq!(outcome, UpdateOutcome::Updated);
        assert_eq!(store.memos()[1].id, first);
        assert_eq!(store.memos()[1].text, "first edited");
        assert_eq!(store.memos()[1].font, MemoFont::Serif);

        store
            .update(&first, "first edited", Some(MemoFont::Mono))
            .unwrap();
        assert_eq!(store.get(&first).unwrap().font, MemoFont::Mono);
    }

    #[test]
    fn observers_see_committed_changes_only() {
        let mut store = MemoStore::open(FlakyRepo::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let handle = store.subscribe(move |change: &MemoChange, memos: &[Memo]| {
            sink.borrow_mut().push((change.clone(), memos.len()));
        });

        let id = store.add("one", None).unwrap().unwrap();
        store.add("   ", None).unwrap();
        store.delete(&crate::MemoId::generate()).unwrap();
        store.update(&id, "", None).unwrap();
        store.clear_all().unwrap();

        assert_eq!(
            seen.borrow().as_slice(),
            &[
                (MemoChange::Added(id.clone()), 1),
                (MemoChange::Deleted(id), 0),
                (MemoChange::Cleared { removed: 0 }, 0),
            ]
        );

        assert!(store.unsubscribe(handle));
        assert!(!store.unsubscribe(handle));
        store.add("after", None).unwrap();
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn failed_load_makes_store_read_only_until_reload() {
        let repo = FlakyRepo::default();
        MemoStore::open(repo.clone()).add("kept", None).unwrap();

        repo.fail_load.set(true);
        assert!(matches!(
            MemoStore::try_open(repo.clone()),
            Err(StoreError::NotLoaded(_))
        ));
        let mut store = MemoStore::open(repo.clone());
        assert!(store.is_read_only());
        assert!(store.is_empty());
        assert!(matches!(store.clear_all(), Err(StoreError::NotLoaded(_))));
        assert_eq!(repo.saved.borrow().len(), 1);

        assert!(store.reload().is_err());
        repo.fail_load.set(false);
        store.reload().unwrap();
        assert!(!store.is_read_only());
        assert_eq!(store.memos()[0].text, "kept");
        store.add("next", None).unwrap();
        assert_eq!(repo.saved.borrow().len(), 2);
    }

    #[test]
    fn store_ids_are_unique() {
        let a = MemoStore::open(FlakyRepo::default());
        let b = MemoStore::open(FlakyRepo::default());
        assert_ne!(a.store_id(), b.store_id());
    }
}
