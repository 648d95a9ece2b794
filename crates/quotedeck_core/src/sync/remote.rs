//! Remote feed contract and blocking HTTP implementation.
//!
//! # Responsibility
//! - Define the outward feed interface used by the sync engine.
//! - Map remote feed items onto quote records deterministically.
//!
//! # Invariants
//! - Mapping never fails: unusable titles collapse to `Untitled` and the
//!   category is always the `Server` sentinel.
//! - One fetch never yields more than the configured batch limit.

use crate::model::quote::{Quote, SERVER_CATEGORY, UNTITLED};
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Read endpoint polled for remote quotes.
pub const DEFAULT_FETCH_URL: &str = "https://jsonplaceholder.typicode.com/posts?_limit=5";

/// Write endpoint for fire-and-forget publishes.
pub const DEFAULT_PUBLISH_URL: &str = "https://jsonplaceholder.typicode.com/posts";

/// Maximum remote items consumed per cycle.
pub const DEFAULT_BATCH_LIMIT: usize = 5;

/// Default pause between automatic sync cycles.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(30);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Endpoints and pacing for the remote sync path.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub fetch_url: String,
    pub publish_url: String,
    pub batch_limit: usize,
    pub interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            fetch_url: DEFAULT_FETCH_URL.to_string(),
            publish_url: DEFAULT_PUBLISH_URL.to_string(),
            batch_limit: DEFAULT_BATCH_LIMIT,
            interval: DEFAULT_SYNC_INTERVAL,
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteFeedError>;

/// Transport and shape errors raised by feed implementations.
///
/// The sync engine swallows all of these: a failing fetch degrades to an
/// empty batch and a failing publish is only logged.
#[derive(Debug)]
pub enum RemoteFeedError {
    Http(Box<ureq::Error>),
    Io(std::io::Error),
    Json(serde_json::Error),
    UnexpectedShape(String),
}

impl Display for RemoteFeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "{err}"),
            Self::UnexpectedShape(message) => write!(f, "{message}"),
        }
    }
}

impl Error for RemoteFeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::UnexpectedShape(_) => None,
        }
    }
}

impl From<ureq::Error> for RemoteFeedError {
    fn from(value: ureq::Error) -> Self {
        Self::Http(Box::new(value))
    }
}

impl From<std::io::Error> for RemoteFeedError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for RemoteFeedError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Outward interface to the remote quote feed.
pub trait RemoteFeed: Send + Sync {
    /// Fetches at most one batch of remote quotes, already mapped onto the
    /// local record shape.
    fn fetch_batch(&self) -> RemoteResult<Vec<Quote>>;

    /// Publishes one local quote; only success or failure matters.
    fn publish(&self, quote: &Quote) -> RemoteResult<()>;
}

#[derive(Serialize)]
struct FeedPublishBody<'a> {
    title: &'a str,
    body: &'a str,
}

/// Blocking HTTP feed over one shared agent with a request timeout.
pub struct HttpRemoteFeed {
    agent: ureq::Agent,
    config: SyncConfig,
}

impl HttpRemoteFeed {
    pub fn new(config: SyncConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self { agent, config }
    }
}

impl RemoteFeed for HttpRemoteFeed {
    fn fetch_batch(&self) -> RemoteResult<Vec<Quote>> {
        let response = self.agent.get(&self.config.fetch_url).call()?;
        let body = response.into_string()?;
        let value: Value = serde_json::from_str(&body)?;
        let Some(items) = value.as_array() else {
            return Err(RemoteFeedError::UnexpectedShape(
                "fetch payload is not a JSON array".to_string(),
            ));
        };

        Ok(items
            .iter()
            .take(self.config.batch_limit)
            .map(quote_from_feed_item)
            .collect())
    }

    fn publish(&self, quote: &Quote) -> RemoteResult<()> {
        let body = serde_json::to_string(&FeedPublishBody {
            title: &quote.text,
            body: &quote.category,
        })?;
        self.agent
            .post(&self.config.publish_url)
            .set("Content-Type", "application/json")
            .send_string(&body)?;
        Ok(())
    }
}

/// Maps one feed item onto the local record shape.
///
/// # Contract
/// - `title` missing, non-string or blank after trim → [`UNTITLED`].
/// - `category` is always [`SERVER_CATEGORY`]; remote categories are not
///   trusted.
fn quote_from_feed_item(item: &Value) -> Quote {
    let title = item
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim();
    let text = if title.is_empty() { UNTITLED } else { title };
    Quote {
        text: text.to_string(),
        category: SERVER_CATEGORY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::quote_from_feed_item;
    use crate::model::quote::{SERVER_CATEGORY, UNTITLED};
    use serde_json::json;

    #[test]
    fn maps_title_to_text_and_fixes_category() {
        let quote = quote_from_feed_item(&json!({"title": "  remote wisdom  ", "body": "x"}));
        assert_eq!(quote.text, "remote wisdom");
        assert_eq!(quote.category, SERVER_CATEGORY);
    }

    #[test]
    fn unusable_titles_collapse_to_untitled() {
        for item in [
            json!({}),
            json!({"title": ""}),
            json!({"title": "   "}),
            json!({"title": 42}),
            json!({"title": null}),
            json!("not an object"),
        ] {
            let quote = quote_from_feed_item(&item);
            assert_eq!(quote.text, UNTITLED);
            assert_eq!(quote.category, SERVER_CATEGORY);
        }
    }
}
