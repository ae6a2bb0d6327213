//! Activity summary for a single advertiser.

use std::time::Duration;

use adscout_core::{AdRecord, AdvertiserSummary, Lexicon};
use chrono::Utc;

use crate::address::title_case;
use crate::error::ScraperError;
use crate::search::fetch_records;
use crate::source::AdSource;

const ADVERTISER_QUERY_RESULTS: usize = 100;

/// Summarizes `records` fetched for `advertiser_name`.
///
/// `total_ads` counts every fetched record. Types and locations come only
/// from records whose advertiser equals the name, ignoring case.
#[must_use]
pub fn summarize_advertiser(
    records: &[AdRecord],
    advertiser_name: &str,
    lexicon: &Lexicon,
) -> AdvertiserSummary {
    let wanted = advertiser_name.to_lowercase();
    let own: Vec<&AdRecord> = records
        .iter()
        .filter(|r| r.advertiser_name.to_lowercase() == wanted)
        .collect();

    let mut ad_types: Vec<String> = Vec::new();
    let mut locations: Vec<String> = Vec::new();
    for record in &own {
        let ad_type = record.ad_type.clone().unwrap_or_else(|| "unknown".to_string());
        if !ad_types.contains(&ad_type) {
            ad_types.push(ad_type);
        }

        let text = record.ad_text.to_lowercase();
        for place in lexicon.cities.iter().chain(&lexicon.neighborhoods) {
            let place = title_case(place);
            if text.contains(&place.to_lowercase()) && !locations.contains(&place) {
                locations.push(place);
            }
        }
    }

    AdvertiserSummary {
        advertiser_name: advertiser_name.to_string(),
        total_ads: records.len(),
        has_active_ads: !records.is_empty(),
        ad_types,
        locations,
        analysis_date: Utc::now(),
    }
}

/// Fetches up to 100 ads matching the advertiser name and summarizes them.
///
/// # Errors
///
/// Propagates the fetch error.
pub async fn advertiser_summary(
    source: &dyn AdSource,
    advertiser_name: &str,
    lexicon: &Lexicon,
    deadline: Duration,
) -> Result<AdvertiserSummary, ScraperError> {
    let records = fetch_records(
        source,
        advertiser_name.trim(),
        ADVERTISER_QUERY_RESULTS,
        deadline,
    )
    .await?;
    let summary = summarize_advertiser(&records, advertiser_name, lexicon);
    tracing::info!(
        advertiser = advertiser_name,
        total_ads = summary.total_ads,
        "advertiser summary complete"
    );
    Ok(summary)
}
