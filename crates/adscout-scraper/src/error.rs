use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid search URL \"{base_url}\": {reason}")]
    InvalidSearchUrl { base_url: String, reason: String },

    #[error("fetch for \"{query}\" exceeded the {deadline_secs}s deadline")]
    Deadline { query: String, deadline_secs: u64 },

    #[error("fixture error for {path}: {reason}")]
    Fixture { path: String, reason: String },

    #[error("fetch cancelled")]
    Cancelled,
}

/// The address was empty or whitespace-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("address is empty or could not be parsed")]
pub struct AddressUnparseable;
