//! Core domain logic for QuoteDeck.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod deck;
pub mod interchange;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;
pub mod sync;

pub use deck::QuoteDeck;
pub use interchange::{export_quotes, import_quotes, ImportError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::quote::{
    seed_quotes, Quote, QuoteValidationError, SERVER_CATEGORY, UNCATEGORIZED, UNTITLED,
};
pub use repo::slot_repo::{
    MemorySlotStore, SlotError, SlotResult, SlotStore, SqliteSlotStore, LAST_CATEGORY_SLOT,
    LAST_VIEWED_SLOT, QUOTES_SLOT,
};
pub use store::category_index::CategoryIndex;
pub use store::quote_store::{QuoteStore, ALL_CATEGORIES};
pub use sync::engine::{SyncEngine, SyncOutcome};
pub use sync::remote::{
    HttpRemoteFeed, RemoteFeed, RemoteFeedError, RemoteResult, SyncConfig, DEFAULT_BATCH_LIMIT,
    DEFAULT_FETCH_URL, DEFAULT_PUBLISH_URL, DEFAULT_SYNC_INTERVAL,
};
pub use sync::scheduler::SyncScheduler;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
