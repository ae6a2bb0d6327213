//! Raw ad container → [`AdRecord`].
//!
//! Every field is derived independently from the container text, links and
//! images. A record is kept only if it has an advertiser or a substantial
//! body; otherwise the entry is skipped (`None`).

use std::collections::BTreeSet;

use adscout_core::AdRecord;
use chrono::{DateTime, Utc};

use crate::source::RawEntry;

pub(crate) const SPONSORED_SENTINELS: &[&str] = &["Patrocinado", "Sponsored"];
pub(crate) const LIBRARY_ID_LABELS: &[&str] = &["Identificação da biblioteca:", "Library ID:"];
const RUN_START_SENTINELS: &[&str] = &["Veiculação iniciada em", "Started running on"];
const PLATFORM_LABELS: &[&str] = &["plataformas", "platforms"];
const KNOWN_PLATFORMS: &[&str] = &["facebook", "instagram", "messenger", "audience network"];

/// Lines holding any of these are page chrome, never an advertiser name.
const ADVERTISER_BLOCKLIST: &[&str] = &[
    "biblioteca",
    "anúncios",
    "filtros",
    "resultado",
    "ativo",
    "lançados",
    "veiculação",
    "plataformas",
    "library",
    "ads",
    "filters",
    "results",
    "active",
    "launched",
    "started running",
    "platforms",
];

/// Body-copy capture ends at the first line containing one of these.
const STOP_MARKERS: &[&str] = &[
    "ifood.com",
    "facebook.com",
    "identificação da biblioteca",
    "veiculação iniciada",
    "plataformas",
    "ver detalhes",
    "library id",
    "started running",
    "platforms",
    "see ad details",
];

const CDN_FRAGMENTS: &[&str] = &["scontent", "fbcdn"];
const LINK_ALLOWLIST: &[&str] = &["ifood.com", "instagram.com", "whatsapp"];
const SOCIAL_DOMAIN: &str = "facebook.com";

const MAX_AD_TEXT_CHARS: usize = 500;
const MAX_CAPTURED_LINES: usize = 5;
const MAX_IMAGES: usize = 3;
const MIN_BODY_CHARS: usize = 30;

/// Extracts an ad record from one raw container, or `None` when it carries
/// neither an advertiser name nor more than 30 characters of body copy.
#[must_use]
pub fn extract_record(entry: &RawEntry, scraped_at: DateTime<Utc>) -> Option<AdRecord> {
    let lines: Vec<&str> = entry.text.lines().collect();

    let advertiser_name = advertiser_name(&lines, entry).unwrap_or_default();
    let ad_text = ad_text(&lines, entry);

    if advertiser_name.is_empty() && char_len(&ad_text) <= MIN_BODY_CHARS {
        return None;
    }

    Some(AdRecord {
        advertiser_name,
        ad_text,
        ad_id: ad_id(&lines),
        ad_type: None,
        start_date: start_date(&lines),
        image_urls: image_urls(entry),
        link_url: link_url(entry),
        platforms: platforms(&lines),
        scraped_at,
    })
}

pub(crate) fn has_sponsored_sentinel(text: &str) -> bool {
    SPONSORED_SENTINELS.iter().any(|s| text.contains(s))
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn within(s: &str, min_exclusive: usize, max_exclusive: usize) -> bool {
    let len = char_len(s);
    len > min_exclusive && len < max_exclusive
}

fn has_stop_marker(line: &str) -> bool {
    let lower = line.to_lowercase();
    STOP_MARKERS.iter().any(|m| lower.contains(m))
}

fn ad_id(lines: &[&str]) -> Option<String> {
    lines.iter().find_map(|line| {
        LIBRARY_ID_LABELS
            .iter()
            .find(|label| line.contains(*label))
            .map(|label| line.replace(label, "").trim().to_string())
            .filter(|id| !id.is_empty())
    })
}

fn advertiser_name(lines: &[&str], entry: &RawEntry) -> Option<String> {
    // Line right above the sponsored sentinel.
    let above_sentinel = lines
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| has_sponsored_sentinel(line))
        .map(|(i, _)| lines[i - 1].trim())
        .find(|candidate| within(candidate, 2, 100));
    if let Some(name) = above_sentinel {
        return Some(name.to_string());
    }

    let social_link = entry
        .links
        .iter()
        .filter(|link| link.href.contains(SOCIAL_DOMAIN))
        .map(|link| link.text.trim())
        .find(|text| char_len(text) > 2);
    if let Some(name) = social_link {
        return Some(name.to_string());
    }

    lines
        .iter()
        .take(10)
        .map(|line| line.trim())
        .find(|line| {
            let lower = line.to_lowercase();
            within(line, 2, 100)
                && !has_sponsored_sentinel(line)
                && !ADVERTISER_BLOCKLIST.iter().any(|w| lower.contains(w))
        })
        .map(str::to_string)
}

fn ad_text(lines: &[&str], entry: &RawEntry) -> String {
    let mut captured: Vec<&str> = Vec::new();
    let mut capturing = false;

    for raw_line in lines {
        let line = raw_line.trim();
        if has_sponsored_sentinel(line) {
            capturing = true;
            continue;
        }
        if !capturing {
            continue;
        }
        if has_stop_marker(line) {
            break;
        }
        if char_len(line) > 5 && !line.starts_with('#') {
            captured.push(line);
        }
        if captured.len() >= MAX_CAPTURED_LINES {
            break;
        }
    }

    let text = if captured.is_empty() {
        entry
            .blocks
            .iter()
            .take(3)
            .map(|block| block.trim())
            .filter(|block| within(block, MIN_BODY_CHARS, MAX_AD_TEXT_CHARS) && !has_stop_marker(block))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        captured.join(" ")
    };

    text.chars().take(MAX_AD_TEXT_CHARS).collect()
}

fn start_date(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .find(|line| RUN_START_SENTINELS.iter().any(|s| line.contains(s)))
        .map(|line| line.trim().to_string())
}

fn image_urls(entry: &RawEntry) -> Vec<String> {
    entry
        .images
        .iter()
        .filter(|src| CDN_FRAGMENTS.iter().any(|f| src.contains(f)))
        .take(MAX_IMAGES)
        .cloned()
        .collect()
}

fn link_url(entry: &RawEntry) -> Option<String> {
    entry
        .links
        .iter()
        .find(|link| LINK_ALLOWLIST.iter().any(|d| link.href.contains(d)))
        .map(|link| link.href.clone())
}

fn platforms(lines: &[&str]) -> BTreeSet<String> {
    lines
        .iter()
        .map(|line| line.to_lowercase())
        .filter(|line| PLATFORM_LABELS.iter().any(|label| line.contains(label)))
        .flat_map(|line| {
            KNOWN_PLATFORMS
                .iter()
                .filter(move |p| line.contains(*p))
                .map(|p| (*p).to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
