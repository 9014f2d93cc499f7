use memopad_core::{
    KeyValueMemoRepository, KeyValueStore, Memo, MemoFont, MemoId, MemoRepository, MemoStore,
    MemoryKeyValueStore, SortOrder, UpdateOutcome, DEFAULT_MEMO_KEY,
};

type TestStore = MemoStore<KeyValueMemoRepository<MemoryKeyValueStore>>;

fn open_store(kv: &MemoryKeyValueStore) -> TestStore {
    MemoStore::open(KeyValueMemoRepository::new(kv.clone()))
}

fn texts(memos: &[Memo]) -> Vec<&str> {
    memos.iter().map(|memo| memo.text.as_str()).collect()
}

fn assert_persisted_matches(store: &TestStore, kv: &MemoryKeyValueStore) {
    let reloaded = KeyValueMemoRepository::new(kv.clone()).load().unwrap();
    assert_eq!(reloaded.as_slice(), store.memos());
}

#[test]
fn add_prepends_and_sorted_view_is_newest_first() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open_store(&kv);

    store.add("hello", None).unwrap();
    store.add("world", None).unwrap();

    assert_eq!(texts(store.memos()), ["world", "hello"]);
    let view = memopad_core::sorted_view(store.memos(), SortOrder::NewestFirst);
    let view_texts = view.iter().map(|memo| memo.text.as_str()).collect::<Vec<_>>();
    assert_eq!(view_texts, ["world", "hello"]);
}

#[test]
fn add_with_blank_text_is_a_no_op_without_write() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open_store(&kv);

    assert_eq!(store.add("   \n\t", None).unwrap(), None);
    assert!(store.is_empty());
    assert_eq!(store.revision(), 0);
    assert!(kv.get(DEFAULT_MEMO_KEY).unwrap().is_none());
}

#[test]
fn add_uses_given_font_or_default() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open_store(&kv);

    let fancy = store.add("fancy", Some(MemoFont::Handwriting)).unwrap().unwrap();
    let plain = store.add("plain", None).unwrap().unwrap();

    assert_eq!(store.get(&fancy).unwrap().font, MemoFont::Handwriting);
    assert_eq!(store.get(&plain).unwrap().font, MemoFont::default());
    assert_eq!(store.fonts(), &MemoFont::ALL);
}

#[test]
fn update_to_blank_deletes_only_that_memo() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open_store(&kv);

    let x = store.add("x", None).unwrap().unwrap();
    assert_eq!(store.update(&x, "", None).unwrap(), UpdateOutcome::Deleted);
    assert!(store.is_empty());

    let a = store.add("a", None).unwrap().unwrap();
    let b = store.add("b", None).unwrap().unwrap();
    assert_eq!(store.update(&a, "  ", None).unwrap(), UpdateOutcome::Deleted);
    assert_eq!(texts(store.memos()), ["b"]);
    assert_eq!(store.memos()[0].id, b);
    assert_persisted_matches(&store, &kv);
}

#[test]
fn update_preserves_id_and_created_at() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open_store(&kv);

    let id = store.add("draft", None).unwrap().unwrap();
    let before = store.get(&id).unwrap().clone();

    assert_eq!(
        store.update(&id, "final", Some(MemoFont::Serif)).unwrap(),
        UpdateOutcome::Updated
    );
    let after = store.get(&id).unwrap();
    assert_eq!(after.id, before.id);
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.text, "final");
    assert_eq!(after.font, MemoFont::Serif);
    assert_persisted_matches(&store, &kv);
}

#[test]
fn unknown_id_update_and_delete_leave_list_unchanged() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open_store(&kv);
    store.add("only", None).unwrap();
    let snapshot = store.memos().to_vec();
    let revision = store.revision();
    let missing = MemoId::parse("does-not-exist").unwrap();

    assert_eq!(
        store.update(&missing, "ghost", None).unwrap(),
        UpdateOutcome::NotFound
    );
    assert!(!store.delete(&missing).unwrap());

    assert_eq!(store.memos(), snapshot.as_slice());
    assert_eq!(store.revision(), revision);
}

#[test]
fn delete_removes_matching_memo() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open_store(&kv);

    let a = store.add("a", None).unwrap().unwrap();
    store.add("b", None).unwrap();
    assert!(store.delete(&a).unwrap());

    assert_eq!(texts(store.memos()), ["b"]);
    assert_persisted_matches(&store, &kv);
}

#[test]
fn clear_all_empties_list_and_storage() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open_store(&kv);
    for text in ["one", "two", "three"] {
        store.add(text, None).unwrap();
    }

    assert_eq!(store.clear_all().unwrap(), 3);
    assert!(store.is_empty());
    assert_eq!(kv.get(DEFAULT_MEMO_KEY).unwrap().as_deref(), Some("[]"));

    assert_eq!(store.clear_all().unwrap(), 0);
    assert!(store.is_empty());
}

#[test]
fn persisted_list_tracks_memory_after_every_operation() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open_store(&kv);

    let first = store.add("first", Some(MemoFont::Mono)).unwrap().unwrap();
    assert_persisted_matches(&store, &kv);
    let second = store.add("second", None).unwrap().unwrap();
    assert_persisted_matches(&store, &kv);
    store.update(&first, "first, edited", None).unwrap();
    assert_persisted_matches(&store, &kv);
    store.add("third", Some(MemoFont::Serif)).unwrap();
    assert_persisted_matches(&store, &kv);
    store.delete(&second).unwrap();
    assert_persisted_matches(&store, &kv);
    store.update(&first, "\n", None).unwrap();
    assert_persisted_matches(&store, &kv);
    store.clear_all().unwrap();
    assert_persisted_matches(&store, &kv);

    store.add("after clear", None).unwrap();
    let reopened = open_store(&kv);
    assert_eq!(reopened.memos(), store.memos());
}

#[test]
fn reload_picks_up_external_writes() {
    let kv = MemoryKeyValueStore::new();
    let mut store = open_store(&kv);
    store.add("mine", None).unwrap();

    let mut other_tab = open_store(&kv);
    other_tab.add("theirs", None).unwrap();

    let revision = store.revision();
    store.reload().unwrap();
    assert_eq!(texts(store.memos()), ["theirs", "mine"]);
    assert!(store.revision() > revision);
}

#[test]
fn custom_key_isolates_lists() {
    let kv = MemoryKeyValueStore::new();
    let mut work = MemoStore::open(KeyValueMemoRepository::with_key(kv.clone(), "work"));
    let home = MemoStore::open(KeyValueMemoRepository::with_key(kv.clone(), "home"));

    work.add("ship it", None).unwrap();
    assert_eq!(work.repository().key(), "work");
    assert!(home.is_empty());
    assert!(kv.get("work").unwrap().is_some());
    assert!(kv.get("home").unwrap().is_none());
}
