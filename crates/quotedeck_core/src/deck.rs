//! Process-wide composition of store, index, interchange and sync.
//!
//! # Responsibility
//! - Wire the quote store, category index and sync engine over one injected
//!   slot store and remote feed.
//! - Expose the operations a presentation layer calls, and nothing else.
//!
//! # Invariants
//! - Built once per process by the embedder; there are no ambient singletons
//!   behind this handle.
//! - Auto-sync runs at most one worker; starting twice is a no-op.

use crate::interchange::{self, ImportError};
use crate::model::quote::{Quote, QuoteValidationError};
use crate::repo::slot_repo::{SlotResult, SlotStore, SqliteSlotStore};
use crate::store::category_index::CategoryIndex;
use crate::store::quote_store::QuoteStore;
use crate::sync::engine::{SyncEngine, SyncOutcome};
use crate::sync::remote::{HttpRemoteFeed, RemoteFeed, SyncConfig};
use crate::sync::scheduler::SyncScheduler;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One quote collection: durable store, derived categories, remote sync.
pub struct QuoteDeck {
    store: Arc<QuoteStore>,
    index: Arc<CategoryIndex>,
    engine: Arc<SyncEngine>,
    config: SyncConfig,
    scheduler: Mutex<Option<SyncScheduler>>,
}

impl QuoteDeck {
    /// Opens a deck over a SQLite file and the HTTP remote feed.
    pub fn open(path: impl AsRef<Path>, config: SyncConfig) -> SlotResult<Self> {
        let slots = Arc::new(SqliteSlotStore::open(path)?);
        let feed = Arc::new(HttpRemoteFeed::new(config.clone()));
        Self::with_parts(slots, feed, config)
    }

    /// Opens a throwaway deck over an in-memory database and the HTTP remote
    /// feed.
    pub fn in_memory(config: SyncConfig) -> SlotResult<Self> {
        let slots = Arc::new(SqliteSlotStore::in_memory()?);
        let feed = Arc::new(HttpRemoteFeed::new(config.clone()));
        Self::with_parts(slots, feed, config)
    }

    /// Wires a deck from caller-provided parts. This is the seam embedders
    /// and tests use to substitute storage or the remote feed.
    pub fn with_parts(
        slots: Arc<dyn SlotStore>,
        feed: Arc<dyn RemoteFeed>,
        config: SyncConfig,
    ) -> SlotResult<Self> {
        let store = Arc::new(QuoteStore::open(Arc::clone(&slots))?);
        let index = Arc::new(CategoryIndex::new(Arc::clone(&store), slots));
        let engine = Arc::new(SyncEngine::new(
            Arc::clone(&store),
            Arc::clone(&index),
            feed,
        ));
        Ok(Self {
            store,
            index,
            engine,
            config,
            scheduler: Mutex::new(None),
        })
    }

    /// Validates and stores one quote.
    ///
    /// When auto-sync is running the new quote is also queued for a
    /// fire-and-forget publish; the publish result never affects the return
    /// value.
    pub fn add_quote(&self, text: &str, category: &str) -> Result<Quote, QuoteValidationError> {
        let quote = self.store.add(text, category)?;
        if let Some(scheduler) = self.lock_scheduler().as_ref() {
            scheduler.notify_remote_async(quote.clone());
        }
        Ok(quote)
    }

    /// Returns a snapshot of the whole collection.
    pub fn quotes(&self) -> Vec<Quote> {
        self.store.all()
    }

    pub fn list_categories(&self) -> Vec<String> {
        self.index.list_categories()
    }

    pub fn current_selection(&self) -> String {
        self.index.current_selection()
    }

    pub fn set_selection(&self, name: &str) {
        self.index.set_selection(name);
    }

    pub fn selection_is_valid(&self, name: &str) -> bool {
        self.index.selection_is_valid(name)
    }

    /// Runs one sync cycle on the caller's thread.
    pub fn run_sync_cycle(&self) -> SyncOutcome {
        self.engine.run_cycle()
    }

    /// Renders the collection as a portable JSON document.
    pub fn export_document(&self) -> String {
        interchange::export_quotes(&self.store)
    }

    /// Imports a portable JSON document, returning how many entries were
    /// appended. Refreshes the category list when anything was.
    pub fn import_document(&self, raw: &str) -> Result<usize, ImportError> {
        let count = interchange::import_quotes(&self.store, raw)?;
        if count > 0 {
            self.index.refresh();
        }
        Ok(count)
    }

    /// Draws a random quote from the pool selected by the current category
    /// filter.
    pub fn random_quote(&self) -> Option<Quote> {
        self.store.random_quote(&self.index.current_selection())
    }

    /// Returns the quote drawn by the most recent [`QuoteDeck::random_quote`]
    /// in this process.
    pub fn last_viewed(&self) -> Option<Quote> {
        self.store.last_viewed()
    }

    /// Starts the periodic sync worker. No-op when already running.
    pub fn start_auto_sync(&self) {
        let mut scheduler = self.lock_scheduler();
        if scheduler.is_none() {
            *scheduler = Some(SyncScheduler::start(
                Arc::clone(&self.engine),
                self.config.interval,
            ));
        }
    }

    /// Stops and joins the periodic sync worker. No-op when not running.
    pub fn stop_auto_sync(&self) {
        if let Some(mut scheduler) = self.lock_scheduler().take() {
            scheduler.stop();
        }
    }

    pub fn auto_sync_running(&self) -> bool {
        self.lock_scheduler().is_some()
    }

    fn lock_scheduler(&self) -> MutexGuard<'_, Option<SyncScheduler>> {
        self.scheduler.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
