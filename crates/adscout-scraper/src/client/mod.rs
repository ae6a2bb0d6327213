//! HTTP-backed [`AdSource`] for the public ad-library search page.

mod html;
mod search_url;

use std::time::Duration;

use adscout_core::AppConfig;
use async_trait::async_trait;
use reqwest::Client;

use crate::error::ScraperError;
use crate::rate_limit::{polite_delay, retry_with_backoff};
use crate::source::{AdSource, RawEntry, SourceProvider};

use search_url::{host_of, search_url};

/// Connection and pacing settings shared by every session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Search page URL, e.g. `https://www.facebook.com/ads/library/`.
    pub base_url: String,
    pub country: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Maximum number of retry attempts after the first failure.
    pub max_retries: u32,
    /// Base delay in seconds for exponential backoff.
    pub backoff_base_secs: u64,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl ClientSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.source_base_url.clone(),
            country: config.source_country.clone(),
            timeout_secs: config.scraper_request_timeout_secs,
            user_agent: config.scraper_user_agent.clone(),
            max_retries: config.scraper_max_retries,
            backoff_base_secs: config.scraper_retry_backoff_base_secs,
            min_delay_ms: config.scraper_min_delay_ms,
            max_delay_ms: config.scraper_max_delay_ms,
        }
    }
}

/// Fetches and segments ad-library result pages.
///
/// Every request waits a random `[min_delay_ms, max_delay_ms]` pause first.
/// HTTP 429, 5xx and network failures are retried with exponential backoff
/// up to `max_retries` additional attempts.
pub struct AdLibraryClient {
    client: Client,
    settings: ClientSettings,
}

impl AdLibraryClient {
    /// Builds a client with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(settings: ClientSettings) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(settings.user_agent.as_str())
            .build()?;
        Ok(Self { client, settings })
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        let settings = &self.settings;
        retry_with_backoff(settings.max_retries, settings.backoff_base_secs, || async move {
            polite_delay(settings.min_delay_ms, settings.max_delay_ms).await;

            let response = self
                .client
                .get(url)
                .header(
                    reqwest::header::ACCEPT,
                    "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
                )
                .header(reqwest::header::ACCEPT_LANGUAGE, "pt-BR,pt;q=0.9,en;q=0.8")
                .header(reqwest::header::CACHE_CONTROL, "no-cache")
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                return Err(ScraperError::RateLimited {
                    domain: host_of(url),
                    retry_after_secs,
                });
            }

            if !status.is_success() {
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            Ok(response.text().await?)
        })
        .await
    }
}

#[async_trait]
impl AdSource for AdLibraryClient {
    async fn fetch(&self, query: &str, max_results: usize) -> Result<Vec<RawEntry>, ScraperError> {
        let url = search_url(&self.settings.base_url, &self.settings.country, query)?;
        tracing::debug!(query, url = %url, "fetching ad library page");

        let body = self.fetch_page(&url).await?;
        let entries = html::parse_search_page(&body, max_results);

        tracing::info!(query, entries = entries.len(), "fetched ad library page");
        Ok(entries)
    }
}

/// Opens a fresh [`AdLibraryClient`] per request.
#[derive(Debug, Clone)]
pub struct AdLibraryProvider {
    settings: ClientSettings,
}

impl AdLibraryProvider {
    #[must_use]
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }
}

impl SourceProvider for AdLibraryProvider {
    fn open_session(&self) -> Result<Box<dyn AdSource>, ScraperError> {
        Ok(Box::new(AdLibraryClient::new(self.settings.clone())?))
    }
}
