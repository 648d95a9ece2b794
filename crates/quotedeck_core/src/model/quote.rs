//! Quote domain model.
//!
//! # Responsibility
//! - Define the canonical quote record shared by store, sync and interchange.
//! - Own the acceptance rules for quote text and category values.
//!
//! # Invariants
//! - `text` is trimmed and non-empty once a quote is accepted into the store.
//! - `category` is never blank; blank or missing input collapses to
//!   [`UNCATEGORIZED`].
//! - Quotes carry no identifier: reconciliation identity is the `text` field
//!   itself (exact, case- and whitespace-sensitive match).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Category assigned when a quote arrives without one.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Category stamped on every quote mapped from the remote feed.
pub const SERVER_CATEGORY: &str = "Server";

/// Text substituted when a remote item has no usable title.
pub const UNTITLED: &str = "Untitled";

/// Validation error raised before any mutation takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteValidationError {
    /// Quote text was empty after trimming.
    EmptyText,
}

impl Display for QuoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "quote text cannot be empty"),
        }
    }
}

impl Error for QuoteValidationError {}

/// Canonical quote record.
///
/// Two quotes with identical `text` are indistinguishable to the sync
/// reconciler and collapse to a single entry during a pull cycle. This is a
/// deliberate simplification carried over from the data contract, not an
/// oversight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Trimmed, non-empty quote body.
    pub text: String,
    /// Category label; [`UNCATEGORIZED`] when the source supplied none.
    pub category: String,
}

impl Quote {
    /// Creates a quote from raw user input.
    ///
    /// # Errors
    /// - [`QuoteValidationError::EmptyText`] when `text` trims to empty.
    pub fn new(text: &str, category: &str) -> Result<Self, QuoteValidationError> {
        Self::sanitize(text, category).ok_or(QuoteValidationError::EmptyText)
    }

    /// Normalizes one `(text, category)` pair into an acceptable quote.
    ///
    /// Every acceptance path (user add, document import, snapshot restore)
    /// funnels through this function, so the stored collection never holds
    /// blank or padded values.
    ///
    /// Returns `None` when the text trims to empty.
    pub fn sanitize(text: &str, category: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let category = category.trim();
        Some(Self {
            text: text.to_string(),
            category: if category.is_empty() {
                UNCATEGORIZED.to_string()
            } else {
                category.to_string()
            },
        })
    }
}

/// Built-in example quotes used when no persisted snapshot exists yet.
pub fn seed_quotes() -> Vec<Quote> {
    [
        (
            "The only way to do great work is to love what you do.",
            "Motivation",
        ),
        (
            "Life is what happens when you\u{2019}re busy making other plans.",
            "Life",
        ),
        ("Be yourself; everyone else is already taken.", "Wisdom"),
        (
            "If you tell the truth, you don\u{2019}t have to remember anything.",
            "Wisdom",
        ),
        (
            "I find that the harder I work, the more luck I seem to have.",
            "Motivation",
        ),
        (
            "I used to think I was indecisive, but now I\u{2019}m not so sure.",
            "Humor",
        ),
    ]
    .into_iter()
    .map(|(text, category)| Quote {
        text: text.to_string(),
        category: category.to_string(),
    })
    .collect()
}
