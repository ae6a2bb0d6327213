//! Record-to-establishment matching.
//!
//! [`is_matching`] decides whether a record belongs to the candidate pool;
//! [`match_confidence`] ranks the pool. The two are deliberately separate
//! rules: a record can pass the predicate on location and category alone
//! while scoring low, and a record can score on location without passing.

use adscout_core::{AdRecord, EstablishmentDescriptor};

const NAME_EXACT_WEIGHT: f64 = 0.60;
const NAME_TOKEN_WEIGHT: f64 = 0.30;
const CITY_WEIGHT: f64 = 0.20;
const NEIGHBORHOOD_WEIGHT: f64 = 0.15;
const CATEGORY_WEIGHT: f64 = 0.05;

/// Name tokens must be longer than this to count as a partial match.
const MIN_TOKEN_CHARS: usize = 3;

fn haystack(record: &AdRecord) -> String {
    format!("{} {}", record.ad_text, record.advertiser_name).to_lowercase()
}

fn contains_lower(haystack: &str, field: &str) -> bool {
    !field.is_empty() && haystack.contains(&field.to_lowercase())
}

fn has_name_token(haystack: &str, name_lower: &str) -> bool {
    name_lower
        .split_whitespace()
        .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
        .any(|token| haystack.contains(token))
}

/// True if the record names the establishment, or mentions its city or
/// neighborhood together with its category.
#[must_use]
pub fn is_matching(record: &AdRecord, target: &EstablishmentDescriptor) -> bool {
    let text = haystack(record);

    if !target.name.is_empty() {
        let name_lower = target.name.to_lowercase();
        if text.contains(&name_lower) || has_name_token(&text, &name_lower) {
            return true;
        }
    }

    let location_hit =
        contains_lower(&text, &target.city) || contains_lower(&text, &target.neighborhood);
    location_hit && contains_lower(&text, &target.category)
}

/// Additive confidence in `[0.0, 1.0]`.
#[must_use]
pub fn match_confidence(record: &AdRecord, target: &EstablishmentDescriptor) -> f64 {
    let text = haystack(record);
    let mut confidence = 0.0_f64;

    if !target.name.is_empty() {
        let name_lower = target.name.to_lowercase();
        if text.contains(&name_lower) {
            confidence += NAME_EXACT_WEIGHT;
        } else if has_name_token(&text, &name_lower) {
            confidence += NAME_TOKEN_WEIGHT;
        }
    }
    if contains_lower(&text, &target.city) {
        confidence += CITY_WEIGHT;
    }
    if contains_lower(&text, &target.neighborhood) {
        confidence += NEIGHBORHOOD_WEIGHT;
    }
    if contains_lower(&text, &target.category) {
        confidence += CATEGORY_WEIGHT;
    }

    confidence.clamp(0.0, 1.0)
}
