//! Domain types shared by the resolution pipeline, the API and the CLI.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured view of a free-text place descriptor.
///
/// Unmatched fields are empty strings rather than absent, so callers can
/// format them without unwrapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstablishmentDescriptor {
    pub name: String,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub category: String,
    pub original_address: String,
}

impl EstablishmentDescriptor {
    /// A descriptor with every inferred field empty.
    #[must_use]
    pub fn unparsed(original_address: &str) -> Self {
        Self {
            original_address: original_address.to_string(),
            ..Self::default()
        }
    }
}

/// One advertisement extracted from a raw ad-library entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdRecord {
    pub advertiser_name: String,
    /// Body copy, at most 500 characters.
    pub ad_text: String,
    pub ad_id: Option<String>,
    /// Creative type when the source classifies it; `None` is reported as `"unknown"`.
    #[serde(default)]
    pub ad_type: Option<String>,
    /// Raw "started running" line. Never parsed into a date.
    pub start_date: Option<String>,
    /// At most three CDN-hosted creative images, in page order.
    pub image_urls: Vec<String>,
    pub link_url: Option<String>,
    #[serde(default)]
    pub platforms: BTreeSet<String>,
    pub scraped_at: DateTime<Utc>,
}

/// Which query-construction rule surfaced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    NameCity,
    NameNeighborhood,
    NameOnly,
    CategoryCity,
}

impl MatchStrategy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStrategy::NameCity => "name_city",
            MatchStrategy::NameNeighborhood => "name_neighborhood",
            MatchStrategy::NameOnly => "name_only",
            MatchStrategy::CategoryCity => "category_city",
        }
    }
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ad judged to belong to the target establishment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    #[serde(flatten)]
    pub record: AdRecord,
    pub match_strategy: MatchStrategy,
    /// In `[0.0, 1.0]`.
    pub match_confidence: f64,
}

/// Outcome of resolving one maps address against the ad library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub establishment_found: bool,
    pub has_ads: bool,
    pub total_matching_ads: usize,
    pub total_ads_searched: usize,
    /// Top five candidates by confidence, ties in discovery order.
    pub matching_ads: Vec<MatchCandidate>,
    pub establishment_info: EstablishmentDescriptor,
    pub maps_address: String,
    pub analysis_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResolutionResult {
    /// A well-formed "nothing found" result carrying an explanatory message.
    #[must_use]
    pub fn not_found(maps_address: &str, error: impl Into<String>) -> Self {
        Self {
            establishment_found: false,
            has_ads: false,
            total_matching_ads: 0,
            total_ads_searched: 0,
            matching_ads: Vec::new(),
            establishment_info: EstablishmentDescriptor::unparsed(maps_address),
            maps_address: maps_address.to_string(),
            analysis_date: Utc::now(),
            error: Some(error.into()),
        }
    }
}

/// Market saturation tier derived from the number of ads found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompetitionLevel {
    #[serde(rename = "alta")]
    High,
    #[serde(rename = "média")]
    Medium,
    #[serde(rename = "baixa")]
    Low,
}

impl CompetitionLevel {
    /// `High` at 50 ads or more, `Medium` at 20 or more, else `Low`.
    #[must_use]
    pub fn from_total(total_ads: usize) -> Self {
        if total_ads >= 50 {
            CompetitionLevel::High
        } else if total_ads >= 20 {
            CompetitionLevel::Medium
        } else {
            CompetitionLevel::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvertiserCount {
    pub advertiser_name: String,
    pub ad_count: usize,
}

/// Market statistics for a (location, business type) query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionAnalysis {
    pub total_ads: usize,
    pub active_advertisers: usize,
    pub competition_level: CompetitionLevel,
    pub top_advertisers: Vec<AdvertiserCount>,
    /// Ads per creative type; unclassified ads count under `"unknown"`.
    pub ad_types: BTreeMap<String, usize>,
    pub analysis_date: DateTime<Utc>,
    pub location: String,
    pub business_type: String,
}

/// Activity summary for a single advertiser name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvertiserSummary {
    pub advertiser_name: String,
    pub total_ads: usize,
    pub has_active_ads: bool,
    pub ad_types: Vec<String>,
    pub locations: Vec<String>,
    pub analysis_date: DateTime<Utc>,
}
