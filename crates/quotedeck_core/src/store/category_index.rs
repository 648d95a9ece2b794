//! Derived category list and persisted filter selection.
//!
//! # Responsibility
//! - Derive the category list from the live quote collection on demand.
//! - Persist and restore the last selected category filter.
//!
//! # Invariants
//! - The derived list always starts with the `All` sentinel and never
//!   contains duplicates or blank names.
//! - A stored selection that no longer matches any category falls back to
//!   `All` on read; the stale slot value is left in place.

use crate::repo::slot_repo::{SlotStore, LAST_CATEGORY_SLOT};
use crate::store::quote_store::{QuoteStore, ALL_CATEGORIES};
use log::{info, warn};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Category view over the quote collection plus the persisted selection.
pub struct CategoryIndex {
    store: Arc<QuoteStore>,
    slots: Arc<dyn SlotStore>,
}

impl CategoryIndex {
    pub fn new(store: Arc<QuoteStore>, slots: Arc<dyn SlotStore>) -> Self {
        Self { store, slots }
    }

    /// Returns `["All", …]` followed by the distinct categories currently in
    /// the collection, trimmed, blanks dropped, sorted case-insensitively
    /// with byte order as tiebreak.
    ///
    /// Dedup is exact-match: `"Life"` and `"life"` are distinct categories.
    pub fn list_categories(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .store
            .all()
            .into_iter()
            .map(|quote| quote.category.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        names.sort_by(|a, b| compare_categories(a, b));

        let mut list = Vec::with_capacity(names.len() + 1);
        list.push(ALL_CATEGORIES.to_string());
        list.extend(names);
        list
    }

    /// Returns the persisted selection, or `All` when none was stored or the
    /// stored one no longer names an existing category.
    pub fn current_selection(&self) -> String {
        let stored = match self.slots.read_slot(LAST_CATEGORY_SLOT) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=selection_read module=store status=warn error_code=slot_read_failed error={err}"
                );
                None
            }
        };

        match stored {
            Some(name) if self.selection_is_valid(&name) => name,
            Some(_) => {
                info!("event=selection_read module=store status=fallback reason=stale");
                ALL_CATEGORIES.to_string()
            }
            None => ALL_CATEGORIES.to_string(),
        }
    }

    /// Persists `name` verbatim as the current selection.
    ///
    /// Validity is the caller's concern at write time; reads validate via
    /// [`CategoryIndex::current_selection`]. Storage failure degrades to a
    /// `warn` log.
    pub fn set_selection(&self, name: &str) {
        if let Err(err) = self.slots.write_slot(LAST_CATEGORY_SLOT, name) {
            warn!(
                "event=selection_write module=store status=warn error_code=slot_write_failed error={err}"
            );
        }
    }

    /// Returns whether `name` is `All` or one of the current categories.
    pub fn selection_is_valid(&self, name: &str) -> bool {
        self.list_categories().iter().any(|category| category == name)
    }

    /// Recomputes the derived list after a mutation burst (sync, import) and
    /// returns it for presentation to rebuild its filter control.
    pub fn refresh(&self) -> Vec<String> {
        let categories = self.list_categories();
        info!(
            "event=category_refresh module=store status=ok count={}",
            categories.len()
        );
        categories
    }
}

fn compare_categories(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
