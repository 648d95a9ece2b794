use quotedeck_core::db::DbError;
use quotedeck_core::{
    seed_quotes, MemorySlotStore, Quote, QuoteStore, QuoteValidationError, SlotError, SlotResult,
    SlotStore, ALL_CATEGORIES, QUOTES_SLOT, UNCATEGORIZED,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Slot store that can be switched to fail every write, standing in for a
/// full disk or exceeded quota.
struct FailingSlotStore {
    inner: MemorySlotStore,
    failing: AtomicBool,
}

impl FailingSlotStore {
    fn new() -> Self {
        Self {
            inner: MemorySlotStore::new(),
            failing: AtomicBool::new(false),
        }
    }

    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl SlotStore for FailingSlotStore {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>> {
        self.inner.read_slot(key)
    }

    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SlotError::Db(DbError::Sqlite(
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_FULL),
                    Some("database or disk is full".to_string()),
                ),
            )));
        }
        self.inner.write_slot(key, value)
    }
}

#[test]
fn open_without_snapshot_seeds_builtin_quotes() {
    let store = QuoteStore::open(Arc::new(MemorySlotStore::new())).unwrap();
    assert_eq!(store.all(), seed_quotes());
}

#[test]
fn open_restores_persisted_snapshot() {
    let slots = Arc::new(MemorySlotStore::new());
    slots
        .write_slot(QUOTES_SLOT, r#"[{"text":"A","category":"X"}]"#)
        .unwrap();

    let store = QuoteStore::open(slots).unwrap();
    assert_eq!(store.all(), vec![quote("A", "X")]);
}

#[test]
fn open_falls_back_to_seeds_for_unusable_snapshots() {
    for payload in ["not json", r#"{"text":"A"}"#, "42", "\"quotes\"", "null"] {
        let slots = Arc::new(MemorySlotStore::new());
        slots.write_slot(QUOTES_SLOT, payload).unwrap();

        let store = QuoteStore::open(slots).unwrap();
        assert_eq!(
            store.all(),
            seed_quotes(),
            "payload {payload:?} should fall back to seeds"
        );
    }
}

#[test]
fn open_keeps_persisted_empty_array_as_empty_collection() {
    let slots = Arc::new(MemorySlotStore::new());
    slots.write_slot(QUOTES_SLOT, "[]").unwrap();

    let store = QuoteStore::open(slots).unwrap();
    assert!(store.is_empty());
}

#[test]
fn open_filters_malformed_snapshot_elements() {
    let slots = Arc::new(MemorySlotStore::new());
    slots
        .write_slot(
            QUOTES_SLOT,
            r#"[
                {"text":"keep","category":"X"},
                {"text":7,"category":"X"},
                {"category":"no text"},
                {"text":"   ","category":"X"},
                "plain string"
            ]"#,
        )
        .unwrap();

    let store = QuoteStore::open(slots).unwrap();
    assert_eq!(store.all(), vec![quote("keep", "X")]);
}

#[test]
fn add_trims_text_and_defaults_blank_category() {
    let store = QuoteStore::open(Arc::new(MemorySlotStore::new())).unwrap();

    let added = store.add("  Hi  ", "").unwrap();
    assert_eq!(added, quote("Hi", UNCATEGORIZED));
    assert_eq!(store.all().last(), Some(&added));
}

#[test]
fn add_rejects_blank_text_without_mutation() {
    let store = QuoteStore::open(Arc::new(MemorySlotStore::new())).unwrap();
    let before = store.all();

    for text in ["", "   ", "\t\n"] {
        let err = store.add(text, "Wisdom").unwrap_err();
        assert_eq!(err, QuoteValidationError::EmptyText);
    }
    assert_eq!(store.all(), before);
}

#[test]
fn add_persists_snapshot_before_returning() {
    let slots = Arc::new(MemorySlotStore::new());
    let store = QuoteStore::open(slots.clone()).unwrap();

    store.add("fresh", "Life").unwrap();

    let payload = slots
        .read_slot(QUOTES_SLOT)
        .unwrap()
        .expect("snapshot should be written");
    let persisted: Vec<Quote> = serde_json::from_str(&payload).unwrap();
    assert_eq!(persisted, store.all());
}

#[test]
fn persist_failure_keeps_the_in_memory_addition() {
    let slots = Arc::new(FailingSlotStore::new());
    let store = QuoteStore::open(slots.clone()).unwrap();

    slots.set_failing(true);
    let added = store.add("survives storage trouble", "Life").unwrap();
    assert!(store.all().contains(&added));
    // durable copy lags behind until the next successful write
    assert_eq!(slots.read_slot(QUOTES_SLOT).unwrap(), None);

    slots.set_failing(false);
    store.add("second", "Life").unwrap();
    let payload = slots.read_slot(QUOTES_SLOT).unwrap().unwrap();
    let persisted: Vec<Quote> = serde_json::from_str(&payload).unwrap();
    assert_eq!(persisted, store.all());
}

#[test]
fn random_quote_respects_category_filter_and_records_last_viewed() {
    let store = QuoteStore::open(Arc::new(MemorySlotStore::new())).unwrap();
    store.add("alpha", "Focus").unwrap();

    let picked = store.random_quote("Focus").expect("pool is not empty");
    assert_eq!(picked, quote("alpha", "Focus"));
    assert_eq!(store.last_viewed(), Some(picked));
}

#[test]
fn random_quote_from_all_draws_from_the_whole_collection() {
    let store = QuoteStore::open(Arc::new(MemorySlotStore::new())).unwrap();

    let picked = store.random_quote(ALL_CATEGORIES).expect("seed pool");
    assert!(store.all().contains(&picked));
}

#[test]
fn random_quote_returns_none_for_an_empty_pool() {
    let store = QuoteStore::open(Arc::new(MemorySlotStore::new())).unwrap();

    assert_eq!(store.random_quote("NoSuchCategory"), None);
    assert_eq!(store.last_viewed(), None);
}

fn quote(text: &str, category: &str) -> Quote {
    Quote {
        text: text.to_string(),
        category: category.to_string(),
    }
}
