//! Remote synchronization: feed contract, reconciliation, scheduling.
//!
//! # Responsibility
//! - Pull remote batches and reconcile them into the local collection.
//! - Publish local additions upstream without awaiting results.
//!
//! # Invariants
//! - The local collection is the source of truth between cycles; remote data
//!   enters only through `SyncEngine::run_cycle`.
//! - Network I/O never runs while the collection lock is held.

pub mod engine;
pub mod remote;
pub mod scheduler;
