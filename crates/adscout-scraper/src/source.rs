//! Ad-source capability and the recorded-fixture implementation.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ScraperError;

/// A hyperlink found inside one ad container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLink {
    pub href: String,
    #[serde(default)]
    pub text: String,
}

/// Rendered content of one candidate ad container, before extraction.
///
/// `text` is the container's visible text with one line per rendered block.
/// `blocks` holds the text of paragraph-like descendants, used when the
/// line-based heuristics find no body copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub text: String,
    #[serde(default)]
    pub links: Vec<RawLink>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub blocks: Vec<String>,
}

/// Anything that can answer an ad-library keyword query.
#[async_trait]
pub trait AdSource: Send + Sync {
    /// Returns at most `max_results` raw entries for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] when the source cannot be reached or answers
    /// with a non-retriable failure.
    async fn fetch(&self, query: &str, max_results: usize) -> Result<Vec<RawEntry>, ScraperError>;
}

/// Opens one [`AdSource`] session per request.
pub trait SourceProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ScraperError`] if the session cannot be constructed.
    fn open_session(&self) -> Result<Box<dyn AdSource>, ScraperError>;
}

#[derive(Debug, Default, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    queries: HashMap<String, Vec<RawEntry>>,
    #[serde(default)]
    fallback: Vec<RawEntry>,
}

/// Replays recorded raw entries keyed by exact query string.
///
/// Queries absent from the fixture return the `fallback` list.
#[derive(Debug, Clone, Default)]
pub struct FixtureAdSource {
    inner: Arc<FixtureFile>,
}

impl FixtureAdSource {
    /// Parses a fixture from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Fixture`] when the JSON does not match the
    /// `{queries: {..}, fallback: [..]}` shape.
    pub fn from_json_str(json: &str) -> Result<Self, ScraperError> {
        let file: FixtureFile = serde_json::from_str(json).map_err(|e| ScraperError::Fixture {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            inner: Arc::new(file),
        })
    }

    /// Loads a fixture file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Fixture`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ScraperError> {
        let fixture_err = |reason: String| ScraperError::Fixture {
            path: path.display().to_string(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| fixture_err(e.to_string()))?;
        let file: FixtureFile =
            serde_json::from_str(&content).map_err(|e| fixture_err(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(file),
        })
    }

    /// Builds a fixture in memory, mostly for tests.
    #[must_use]
    pub fn from_entries(queries: HashMap<String, Vec<RawEntry>>, fallback: Vec<RawEntry>) -> Self {
        Self {
            inner: Arc::new(FixtureFile { queries, fallback }),
        }
    }
}

#[async_trait]
impl AdSource for FixtureAdSource {
    async fn fetch(&self, query: &str, max_results: usize) -> Result<Vec<RawEntry>, ScraperError> {
        let entries = self.inner.queries.get(query).unwrap_or(&self.inner.fallback);
        tracing::debug!(query, count = entries.len(), "replaying fixture entries");
        Ok(entries.iter().take(max_results).cloned().collect())
    }
}

impl SourceProvider for FixtureAdSource {
    fn open_session(&self) -> Result<Box<dyn AdSource>, ScraperError> {
        Ok(Box::new(self.clone()))
    }
}
