//! Server-wins reconciliation over the local quote collection.
//!
//! # Responsibility
//! - Run one sync cycle: fetch a remote batch, reconcile it into the store,
//!   refresh the category index when anything changed.
//! - Publish local quotes upstream on request; the result is only logged.
//!
//! # Invariants
//! - Remote failures never surface to callers: a failed fetch degrades to an
//!   empty batch and the cycle reports zero updates.
//! - Reconciling the same batch twice applies zero updates the second time.
//! - Reconciliation and persistence happen inside the store's critical
//!   section, so a cycle cannot interleave with other mutations.

use crate::model::quote::Quote;
use crate::store::category_index::CategoryIndex;
use crate::store::quote_store::QuoteStore;
use crate::sync::remote::RemoteFeed;
use log::{info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// Result of one sync cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Total entries added or changed by the cycle.
    pub updates_applied: usize,
    pub additions: usize,
    pub overwrites: usize,
    /// User-facing notice, present only when something changed. Delivery and
    /// self-clearing belong to the presentation layer.
    pub message: Option<String>,
}

impl SyncOutcome {
    fn from_counts(additions: usize, overwrites: usize) -> Self {
        let updates_applied = additions + overwrites;
        let message = (updates_applied > 0).then(|| {
            format!("Synced {updates_applied} update(s) from server (server wins).")
        });
        Self {
            updates_applied,
            additions,
            overwrites,
            message,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.updates_applied == 0
    }
}

/// Orchestrates pull cycles and fire-and-forget pushes.
pub struct SyncEngine {
    store: Arc<QuoteStore>,
    index: Arc<CategoryIndex>,
    feed: Arc<dyn RemoteFeed>,
}

impl SyncEngine {
    pub fn new(
        store: Arc<QuoteStore>,
        index: Arc<CategoryIndex>,
        feed: Arc<dyn RemoteFeed>,
    ) -> Self {
        Self { store, index, feed }
    }

    /// Runs one pull-and-reconcile cycle.
    ///
    /// # Contract
    /// - Fetch failure → empty batch, `warn` log, zero-update outcome.
    /// - Zero updates → no snapshot write, no index refresh, no message.
    pub fn run_cycle(&self) -> SyncOutcome {
        let started_at = Instant::now();
        info!("event=sync_cycle module=sync status=start");

        let batch = match self.feed.fetch_batch() {
            Ok(batch) => batch,
            Err(err) => {
                warn!(
                    "event=sync_fetch module=sync status=warn error_code=fetch_failed error={err}"
                );
                Vec::new()
            }
        };

        let outcome = self.store.update(|quotes| {
            let outcome = reconcile(quotes, &batch);
            let changed = !outcome.is_noop();
            (outcome, changed)
        });

        if !outcome.is_noop() {
            self.index.refresh();
        }

        info!(
            "event=sync_cycle module=sync status=ok duration_ms={} batch={} additions={} overwrites={}",
            started_at.elapsed().as_millis(),
            batch.len(),
            outcome.additions,
            outcome.overwrites
        );
        outcome
    }

    /// Publishes one quote upstream. Failures are logged, never returned;
    /// upstream does not influence local state.
    pub fn publish_quote(&self, quote: &Quote) {
        match self.feed.publish(quote) {
            Ok(()) => info!("event=sync_publish module=sync status=ok"),
            Err(err) => warn!(
                "event=sync_publish module=sync status=warn error_code=publish_failed error={err}"
            ),
        }
    }
}

/// Applies one remote batch to the collection, server-wins-by-text.
///
/// Unknown texts are appended in batch order; a known text overwrites the
/// first local entry carrying it. An overwrite counts only when it actually
/// changes the entry, which keeps repeated passes over the same batch at
/// zero updates.
fn reconcile(quotes: &mut Vec<Quote>, batch: &[Quote]) -> SyncOutcome {
    let mut seen: HashSet<String> = quotes.iter().map(|quote| quote.text.clone()).collect();
    let mut additions = 0;
    let mut overwrites = 0;

    for remote in batch {
        if seen.contains(&remote.text) {
            if let Some(local) = quotes.iter_mut().find(|quote| quote.text == remote.text) {
                if *local != *remote {
                    *local = remote.clone();
                    overwrites += 1;
                }
            }
        } else {
            // Appended texts join the seen set so a duplicate later in the
            // same batch reconciles against the entry just added.
            seen.insert(remote.text.clone());
            quotes.push(remote.clone());
            additions += 1;
        }
    }

    SyncOutcome::from_counts(additions, overwrites)
}
