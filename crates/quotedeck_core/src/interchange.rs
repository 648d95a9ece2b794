//! Import/export gateway for the portable quote document.
//!
//! # Responsibility
//! - Render the whole collection as a human-readable JSON document.
//! - Append the valid entries of an external document to the collection.
//!
//! # Invariants
//! - Import is all-or-nothing at the document level: an unparseable or
//!   non-array document changes nothing.
//! - Import never deduplicates against existing entries; only the sync path
//!   reconciles by text.

use crate::model::quote::Quote;
use crate::store::quote_store::QuoteStore;
use log::{info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Document-level import rejections. Raised before any mutation.
#[derive(Debug)]
pub enum ImportError {
    InvalidJson(serde_json::Error),
    NotAnArray,
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(err) => write!(f, "import document is not valid JSON: {err}"),
            Self::NotAnArray => write!(f, "import document must be a JSON array"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidJson(err) => Some(err),
            Self::NotAnArray => None,
        }
    }
}

/// Renders the whole collection as a pretty-printed (2-space) JSON array.
pub fn export_quotes(store: &QuoteStore) -> String {
    let quotes = store.all();
    match serde_json::to_string_pretty(&quotes) {
        Ok(document) => document,
        Err(err) => {
            warn!(
                "event=export module=interchange status=warn error_code=encode_failed error={err}"
            );
            String::from("[]")
        }
    }
}

/// Appends the valid entries of `raw` to the collection and persists once.
///
/// # Contract
/// - Unparseable document → [`ImportError::InvalidJson`], nothing applied.
/// - Parsed non-array → [`ImportError::NotAnArray`], nothing applied.
/// - Elements without a usable `text` string are skipped silently; a
///   missing, non-string or blank `category` falls back to the sentinel.
///
/// Returns the number of entries appended.
pub fn import_quotes(store: &QuoteStore, raw: &str) -> Result<usize, ImportError> {
    let value: Value = serde_json::from_str(raw).map_err(ImportError::InvalidJson)?;
    let Some(items) = value.as_array() else {
        return Err(ImportError::NotAnArray);
    };

    let total = items.len();
    let accepted: Vec<Quote> = items.iter().filter_map(import_element).collect();
    let count = accepted.len();

    if count > 0 {
        store.update(move |quotes| {
            quotes.extend(accepted);
            ((), true)
        });
    }

    info!(
        "event=import module=interchange status=ok accepted={count} skipped={}",
        total - count
    );
    Ok(count)
}

/// Accepts one external element. External documents are untrusted, so the
/// category is tolerated in any shape while the text must be a real string.
fn import_element(value: &Value) -> Option<Quote> {
    let text = value.get("text")?.as_str()?;
    let category = value
        .get("category")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Quote::sanitize(text, category)
}
