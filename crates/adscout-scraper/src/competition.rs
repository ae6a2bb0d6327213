//! Market statistics over a set of ad records.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use adscout_core::{AdRecord, AdvertiserCount, CompetitionAnalysis, CompetitionLevel};
use chrono::Utc;

use crate::error::ScraperError;
use crate::search::{fetch_records, DEFAULT_SEARCH_RESULTS};
use crate::source::AdSource;

const TOP_ADVERTISERS: usize = 10;
const UNKNOWN_ADVERTISER: &str = "Unknown";
const UNKNOWN_AD_TYPE: &str = "unknown";

/// Counts occurrences of each advertiser, keeping first-seen order.
fn tally<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for key in keys {
        if let Some(&i) = index.get(key) {
            counts[i].1 += 1;
        } else {
            index.insert(key, counts.len());
            counts.push((key.to_string(), 1));
        }
    }
    counts
}

/// Aggregates `records` into a competition report.
#[must_use]
pub fn analyze_competition(
    records: &[AdRecord],
    location: &str,
    business_type: &str,
) -> CompetitionAnalysis {
    let advertisers = tally(records.iter().map(|r| {
        if r.advertiser_name.is_empty() {
            UNKNOWN_ADVERTISER
        } else {
            r.advertiser_name.as_str()
        }
    }));
    let mut ad_types: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        let ad_type = record.ad_type.as_deref().unwrap_or(UNKNOWN_AD_TYPE);
        *ad_types.entry(ad_type.to_string()).or_insert(0) += 1;
    }

    let active_advertisers = advertisers.len();

    let mut top = advertisers;
    // Stable: equal counts keep first-seen order.
    top.sort_by(|a, b| b.1.cmp(&a.1));
    top.truncate(TOP_ADVERTISERS);

    CompetitionAnalysis {
        total_ads: records.len(),
        active_advertisers,
        competition_level: CompetitionLevel::from_total(records.len()),
        top_advertisers: top
            .into_iter()
            .map(|(advertiser_name, ad_count)| AdvertiserCount {
                advertiser_name,
                ad_count,
            })
            .collect(),
        ad_types,
        analysis_date: Utc::now(),
        location: location.to_string(),
        business_type: business_type.to_string(),
    }
}

/// Fetches up to 50 ads for `"{business_type} {location}"` and analyzes them.
///
/// # Errors
///
/// Propagates the fetch error.
pub async fn competition_for(
    source: &dyn AdSource,
    location: &str,
    business_type: &str,
    deadline: Duration,
) -> Result<CompetitionAnalysis, ScraperError> {
    let query = format!("{business_type} {location}");
    let records = fetch_records(source, &query, DEFAULT_SEARCH_RESULTS, deadline).await?;
    let analysis = analyze_competition(&records, location, business_type);
    tracing::info!(
        query = %query,
        total_ads = analysis.total_ads,
        level = ?analysis.competition_level,
        "competition analysis complete"
    );
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn record(advertiser: &str, ad_type: Option<&str>) -> AdRecord {
        AdRecord {
            advertiser_name: advertiser.to_string(),
            ad_text: String::new(),
            ad_id: None,
            ad_type: ad_type.map(str::to_string),
            start_date: None,
            image_urls: vec![],
            link_url: None,
            platforms: BTreeSet::new(),
            scraped_at: Utc::now(),
        }
    }

    #[test]
    fn fifty_five_records_is_high_competition() {
        let records: Vec<_> = (0..55).map(|i| record(&format!("A{i}"), None)).collect();
        let analysis = analyze_competition(&records, "Copacabana", "bar");
        assert_eq!(analysis.total_ads, 55);
        assert_eq!(analysis.competition_level, CompetitionLevel::High);
        assert_eq!(analysis.active_advertisers, 55);
        assert_eq!(analysis.top_advertisers.len(), 10);
        assert_eq!(analysis.ad_types.get("unknown"), Some(&55));
        assert_eq!(analysis.ad_types.len(), 1);
    }

    #[test]
    fn empty_input_is_low_competition() {
        let analysis = analyze_competition(&[], "Centro", "loja");
        assert_eq!(analysis.total_ads, 0);
        assert_eq!(analysis.active_advertisers, 0);
        assert_eq!(analysis.competition_level, CompetitionLevel::Low);
        assert!(analysis.top_advertisers.is_empty());
        assert!(analysis.ad_types.is_empty());
        assert_eq!(analysis.location, "Centro");
        assert_eq!(analysis.business_type, "loja");
    }

    #[test]
    fn top_advertisers_sorted_with_stable_ties() {
        let records = vec![
            record("B", Some("image")),
            record("A", Some("video")),
            record("A", None),
            record("", None),
            record("B", Some("image")),
            record("C", None),
        ];
        let analysis = analyze_competition(&records, "x", "y");
        let names: Vec<_> = analysis
            .top_advertisers
            .iter()
            .map(|a| (a.advertiser_name.as_str(), a.ad_count))
            .collect();
        assert_eq!(names, vec![("B", 2), ("A", 2), ("Unknown", 1), ("C", 1)]);
        assert_eq!(analysis.active_advertisers, 4);
        assert_eq!(analysis.ad_types.get("image"), Some(&2));
        assert_eq!(analysis.ad_types.get("video"), Some(&1));
        assert_eq!(analysis.ad_types.get("unknown"), Some(&3));
        assert_eq!(analysis.competition_level, CompetitionLevel::Low);
    }

    #[test]
    fn twenty_records_is_medium() {
        let records: Vec<_> = (0..20).map(|_| record("Same", None)).collect();
        let analysis = analyze_competition(&records, "x", "y");
        assert_eq!(analysis.competition_level, CompetitionLevel::Medium);
        assert_eq!(analysis.active_advertisers, 1);
    }
}
