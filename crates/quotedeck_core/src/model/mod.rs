//! Domain model for the quote collection.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep a single quote-centric shape shared by store, sync and interchange.
//!
//! # Invariants
//! - Stored quote text is always trimmed and non-empty.
//! - Quote identity is the text itself; there is no separate id field.

pub mod quote;
