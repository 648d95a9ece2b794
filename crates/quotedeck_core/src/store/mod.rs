//! Quote collection state and derived views.
//!
//! # Responsibility
//! - Hold the process-resident quote collection and its snapshot lifecycle.
//! - Derive the category list and manage the persisted filter selection.
//!
//! # Invariants
//! - All collection mutations serialize through `QuoteStore::update`.
//! - Derived views never cache; they recompute from the live collection.

pub mod category_index;
pub mod quote_store;
