//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the slot storage contract used by store and sync orchestration.
//! - Isolate SQLite query details from collection/business logic.
//!
//! # Invariants
//! - Repository APIs return transport errors; domain validation lives above.
//! - Implementations are `Send + Sync` so the sync worker can share them.

pub mod slot_repo;
