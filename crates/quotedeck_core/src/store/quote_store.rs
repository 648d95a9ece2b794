//! In-memory quote collection with durable snapshot persistence.
//!
//! # Responsibility
//! - Own the canonical quote collection for the process lifetime.
//! - Restore the collection from the `quotes` slot on open; fall back to the
//!   built-in seed set when no usable snapshot exists.
//! - Persist the whole collection after every accepted mutation.
//!
//! # Invariants
//! - Every mutation runs read-modify-write and persist inside one critical
//!   section, so concurrent mutations serialize instead of clobbering each
//!   other's snapshots.
//! - Persistence failures never roll back the in-memory mutation; they are
//!   logged and the durable copy catches up on the next successful write.
//! - An empty persisted array restores an empty collection; seeding happens
//!   only when the snapshot is absent, unparseable or not an array.

use crate::model::quote::{seed_quotes, Quote, QuoteValidationError};
use crate::repo::slot_repo::{
    MemorySlotStore, SlotResult, SlotStore, LAST_VIEWED_SLOT, QUOTES_SLOT,
};
use log::{info, warn};
use rand::Rng;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Category selection sentinel meaning "no filter".
pub const ALL_CATEGORIES: &str = "All";

/// Process-resident quote collection backed by one durable snapshot slot.
pub struct QuoteStore {
    slots: Arc<dyn SlotStore>,
    session: MemorySlotStore,
    quotes: Mutex<Vec<Quote>>,
}

impl QuoteStore {
    /// Opens the store, restoring the collection from the `quotes` slot.
    ///
    /// # Contract
    /// - Absent slot, unparseable payload or non-array payload → seed set.
    /// - Array payload → element-wise shape filter; malformed elements are
    ///   skipped silently.
    /// - Restoring does not write the slot back; the first mutation does.
    pub fn open(slots: Arc<dyn SlotStore>) -> SlotResult<Self> {
        let restored = match slots.read_slot(QUOTES_SLOT)? {
            Some(raw) => decode_snapshot(&raw),
            None => None,
        };
        let (quotes, source) = match restored {
            Some(quotes) => (quotes, "snapshot"),
            None => (seed_quotes(), "seeds"),
        };
        info!(
            "event=store_restore module=store status=ok source={source} count={}",
            quotes.len()
        );

        Ok(Self {
            slots,
            session: MemorySlotStore::new(),
            quotes: Mutex::new(quotes),
        })
    }

    /// Validates and appends one quote, then persists the snapshot.
    ///
    /// # Errors
    /// - [`QuoteValidationError::EmptyText`] when `text` trims to empty; the
    ///   collection is untouched in that case.
    pub fn add(&self, text: &str, category: &str) -> Result<Quote, QuoteValidationError> {
        let quote = Quote::new(text, category)?;
        self.update(|quotes| {
            quotes.push(quote.clone());
            ((), true)
        });
        info!(
            "event=quote_add module=store status=ok category={}",
            quote.category
        );
        Ok(quote)
    }

    /// Returns a cloned snapshot of the whole collection.
    pub fn all(&self) -> Vec<Quote> {
        self.lock_quotes().clone()
    }

    pub fn len(&self) -> usize {
        self.lock_quotes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_quotes().is_empty()
    }

    /// Draws one uniformly random quote from the pool selected by `selection`
    /// ([`ALL_CATEGORIES`] = whole collection, otherwise exact category
    /// match). Returns `None` when the pool is empty.
    ///
    /// # Side effects
    /// - Records the drawn quote in the ephemeral `lastViewedQuote` session
    ///   slot for [`QuoteStore::last_viewed`].
    pub fn random_quote(&self, selection: &str) -> Option<Quote> {
        let pool: Vec<Quote> = {
            let quotes = self.lock_quotes();
            quotes
                .iter()
                .filter(|quote| selection == ALL_CATEGORIES || quote.category == selection)
                .cloned()
                .collect()
        };
        if pool.is_empty() {
            return None;
        }

        let picked = pool[rand::thread_rng().gen_range(0..pool.len())].clone();
        match serde_json::to_string(&picked) {
            Ok(payload) => {
                if let Err(err) = self.session.write_slot(LAST_VIEWED_SLOT, &payload) {
                    warn!(
                        "event=last_viewed_write module=store status=warn error_code=slot_write_failed error={err}"
                    );
                }
            }
            Err(err) => {
                warn!(
                    "event=last_viewed_write module=store status=warn error_code=encode_failed error={err}"
                );
            }
        }
        Some(picked)
    }

    /// Returns the quote recorded by the most recent [`QuoteStore::random_quote`]
    /// draw in this process, if any.
    pub fn last_viewed(&self) -> Option<Quote> {
        let payload = self.session.read_slot(LAST_VIEWED_SLOT).ok()??;
        serde_json::from_str(&payload).ok()
    }

    /// Runs `op` over the locked collection and persists the snapshot inside
    /// the same critical section when `op` reports a change.
    ///
    /// All mutating paths (add, import apply, sync reconciliation) go through
    /// here, which is what makes interleaved mutations last-writer-safe.
    pub(crate) fn update<T>(&self, op: impl FnOnce(&mut Vec<Quote>) -> (T, bool)) -> T {
        let mut quotes = self.lock_quotes();
        let (result, changed) = op(&mut quotes);
        if changed {
            self.persist(&quotes);
        }
        result
    }

    fn persist(&self, quotes: &[Quote]) {
        let payload = match serde_json::to_string(quotes) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    "event=store_persist module=store status=warn error_code=encode_failed error={err}"
                );
                return;
            }
        };
        if let Err(err) = self.slots.write_slot(QUOTES_SLOT, &payload) {
            warn!(
                "event=store_persist module=store status=warn error_code=slot_write_failed error={err}"
            );
        }
    }

    fn lock_quotes(&self) -> MutexGuard<'_, Vec<Quote>> {
        // Mutations under this lock are applied all-or-nothing, so data
        // behind a poisoned lock is still coherent.
        self.quotes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Decodes a persisted snapshot payload.
///
/// Returns `None` when the payload is unparseable or not a JSON array; the
/// caller falls back to the seed set in that case.
fn decode_snapshot(raw: &str) -> Option<Vec<Quote>> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(
                "event=store_restore module=store status=warn error_code=snapshot_unparseable error={err}"
            );
            return None;
        }
    };
    let Some(items) = value.as_array() else {
        warn!("event=store_restore module=store status=warn error_code=snapshot_not_array");
        return None;
    };

    Some(items.iter().filter_map(restore_element).collect())
}

/// Restores one snapshot element. Snapshots are written by this crate, so
/// both fields must be strings; anything else is treated as corruption and
/// skipped.
fn restore_element(value: &Value) -> Option<Quote> {
    let text = value.get("text")?.as_str()?;
    let category = value.get("category")?.as_str()?;
    Quote::sanitize(text, category)
}
