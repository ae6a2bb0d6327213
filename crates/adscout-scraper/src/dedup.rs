//! Collapses ad records that describe the same listing.

use std::collections::HashSet;

use adscout_core::AdRecord;

/// Deterministic identity of a record: the first 50 characters of the
/// advertiser and the first 100 of the body, lower-cased, whitespace removed.
#[must_use]
pub fn dedup_key(record: &AdRecord) -> String {
    let advertiser: String = record.advertiser_name.chars().take(50).collect();
    let text: String = record.ad_text.chars().take(100).collect();
    format!("{advertiser}_{text}")
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Remembers keys across batches so a listing seen under one query is not
/// counted again under the next.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first record per key, in encounter order, across every batch
    /// this instance has processed.
    pub fn retain_new(&mut self, records: Vec<AdRecord>) -> Vec<AdRecord> {
        records
            .into_iter()
            .filter(|record| self.seen.insert(dedup_key(record)))
            .collect()
    }
}

/// One-shot dedup of a single batch.
#[must_use]
pub fn dedup_records(records: Vec<AdRecord>) -> Vec<AdRecord> {
    Deduplicator::new().retain_new(records)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::Utc;

    use super::*;

    fn record(advertiser: &str, text: &str) -> AdRecord {
        AdRecord {
            advertiser_name: advertiser.to_string(),
            ad_text: text.to_string(),
            ad_id: None,
            ad_type: None,
            start_date: None,
            image_urls: vec![],
            link_url: None,
            platforms: BTreeSet::new(),
            scraped_at: Utc::now(),
        }
    }

    #[test]
    fn key_ignores_case_and_whitespace() {
        assert_eq!(
            dedup_key(&record("Balada Mix", "Open  bar hoje")),
            dedup_key(&record("balada mix", "open bar\nhoje"))
        );
        assert_eq!(dedup_key(&record("A B", "c d")), "ab_cd");
    }

    #[test]
    fn key_only_looks_at_text_prefix() {
        let prefix = "x".repeat(100);
        let a = record("Loja", &format!("{prefix} final A"));
        let b = record("Loja", &format!("{prefix} final B"));
        assert_eq!(dedup_key(&a), dedup_key(&b));
    }

    #[test]
    fn same_key_collapses_to_first() {
        let out = dedup_records(vec![
            record("Balada Mix", "Sexta tem festa"),
            record("BALADA MIX", "sexta tem  festa"),
            record("Outro", "Sexta tem festa"),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].advertiser_name, "Balada Mix");
        assert_eq!(out[1].advertiser_name, "Outro");
    }

    #[test]
    fn deduplicator_remembers_across_batches() {
        let mut dedup = Deduplicator::new();
        let first = dedup.retain_new(vec![record("A", "one"), record("B", "two")]);
        let second = dedup.retain_new(vec![record("a", "one"), record("C", "three")]);
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].advertiser_name, "C");
    }

    #[test]
    fn dedup_is_idempotent() {
        let once = dedup_records(vec![
            record("A", "one"),
            record("a", "o n e"),
            record("B", "two"),
        ]);
        let twice = dedup_records(once.clone());
        assert_eq!(once, twice);
    }
}
