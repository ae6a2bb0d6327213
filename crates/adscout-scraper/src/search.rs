//! Keyword search over an [`AdSource`]: fetch, extract, dedup.

use std::time::Duration;

use adscout_core::AdRecord;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::dedup::Deduplicator;
use crate::error::ScraperError;
use crate::extract::extract_record;
use crate::source::{AdSource, RawEntry};

pub const DEFAULT_SEARCH_RESULTS: usize = 50;
pub const MAX_SEARCH_RESULTS: usize = 200;

/// Response body of a location/business-type search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSearch {
    pub ads: Vec<AdRecord>,
    pub total_found: usize,
    pub location: String,
    pub business_type: String,
}

/// Applies the default of 50 and clamps into `[1, 200]`.
#[must_use]
pub fn clamp_max_results(requested: Option<i64>) -> usize {
    requested.map_or(DEFAULT_SEARCH_RESULTS, |n| {
        usize::try_from(n).unwrap_or(0).clamp(1, MAX_SEARCH_RESULTS)
    })
}

/// Fetches raw entries for `query` under `deadline`.
///
/// # Errors
///
/// Returns [`ScraperError::Deadline`] when the source does not answer in
/// time, or whatever error the source itself reports.
pub async fn fetch_raw(
    source: &dyn AdSource,
    query: &str,
    max_results: usize,
    deadline: Duration,
) -> Result<Vec<RawEntry>, ScraperError> {
    match tokio::time::timeout(deadline, source.fetch(query, max_results)).await {
        Ok(result) => result,
        Err(_) => Err(ScraperError::Deadline {
            query: query.to_string(),
            deadline_secs: deadline.as_secs(),
        }),
    }
}

/// Converts raw entries into deduplicated records, dropping unusable ones.
pub fn records_from_entries(entries: &[RawEntry], dedup: &mut Deduplicator) -> Vec<AdRecord> {
    let scraped_at = Utc::now();
    let records = entries
        .iter()
        .filter_map(|entry| extract_record(entry, scraped_at))
        .collect();
    dedup.retain_new(records)
}

/// Fetches, extracts and deduplicates the records for one query.
///
/// # Errors
///
/// Propagates the fetch error from [`fetch_raw`].
pub async fn fetch_records(
    source: &dyn AdSource,
    query: &str,
    max_results: usize,
    deadline: Duration,
) -> Result<Vec<AdRecord>, ScraperError> {
    let entries = fetch_raw(source, query, max_results, deadline).await?;
    let records = records_from_entries(&entries, &mut Deduplicator::new());
    tracing::debug!(
        query,
        raw = entries.len(),
        records = records.len(),
        "extracted ad records"
    );
    Ok(records)
}

/// Searches `"{business_type} {location}"` and returns at most `max_results` ads.
///
/// # Errors
///
/// Propagates the fetch error from [`fetch_raw`].
pub async fn search_by_location(
    source: &dyn AdSource,
    location: &str,
    business_type: &str,
    max_results: usize,
    deadline: Duration,
) -> Result<LocationSearch, ScraperError> {
    let query = format!("{business_type} {location}");
    let mut ads = fetch_records(source, &query, max_results, deadline).await?;
    ads.truncate(max_results);

    tracing::info!(query = %query, found = ads.len(), "location search complete");

    Ok(LocationSearch {
        total_found: ads.len(),
        ads,
        location: location.to_string(),
        business_type: business_type.to_string(),
    })
}
