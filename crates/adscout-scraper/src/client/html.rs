//! Segments an ad-library results page into [`RawEntry`] containers.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};

use crate::extract::has_sponsored_sentinel;
use crate::source::{RawEntry, RawLink};

/// Tried in order; the first selector yielding any usable container wins.
const CONTAINER_SELECTORS: &[&str] = &[
    "div[data-testid='ad-card']",
    "div[role='article']",
    "div[data-ad-preview='message']",
    "div[data-testid='political-ad']",
];

const NO_RESULTS_MARKERS: &[&str] = &["nenhum resultado", "no results", "0 resultado", "sem anúncios"];
const AD_INFO_MARKERS: &[&str] = &[
    "Identificação da biblioteca",
    "Veiculação iniciada",
    "Library ID",
    "Started running",
];
/// Elements that start and end a line of rendered text.
const BLOCK_ELEMENTS: &[&str] = &[
    "div", "p", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "section", "article",
    "header", "footer", "table", "tr",
];
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];
const AD_LINK_DOMAINS: &[&str] = &["facebook.com", "ifood.com"];

const MAX_FALLBACK_CHARS: usize = 2000;
const MIN_ENTRY_CHARS: usize = 20;
const UNIQUE_KEY_CHARS: usize = 100;
const MIN_BLOCK_DIRECT_CHARS: usize = 30;

/// Extracts at most `max_results` candidate ad containers from `html`.
///
/// Returns an empty list when nothing container-like is found, including
/// pages that state there are no results.
pub(crate) fn parse_search_page(html: &str, max_results: usize) -> Vec<RawEntry> {
    let document = Html::parse_document(html);

    let mut entries = containers_by_selector(&document);
    if entries.is_empty() {
        entries = containers_by_sentinel(&document);
    }

    if entries.is_empty() {
        let page = visible_text(document.root_element()).to_lowercase();
        if NO_RESULTS_MARKERS.iter().any(|m| page.contains(m)) {
            tracing::debug!("results page reports no ads");
        } else {
            tracing::warn!("no ad containers recognised on results page");
        }
        return Vec::new();
    }

    entries.truncate(max_results);
    entries
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn containers_by_selector(document: &Html) -> Vec<RawEntry> {
    for css in CONTAINER_SELECTORS {
        let Some(sel) = selector(css) else {
            continue;
        };
        let entries = unique_entries(document.select(&sel).map(raw_entry));
        if !entries.is_empty() {
            tracing::debug!(selector = css, count = entries.len(), "matched ad containers");
            return entries;
        }
    }
    Vec::new()
}

fn containers_by_sentinel(document: &Html) -> Vec<RawEntry> {
    let Some(divs) = selector("div") else {
        return Vec::new();
    };
    let candidates = document.select(&divs).map(raw_entry).filter(|entry| {
        let has_ad_link = entry
            .links
            .iter()
            .any(|l| AD_LINK_DOMAINS.iter().any(|d| l.href.contains(d)));
        let has_ad_info = AD_INFO_MARKERS.iter().any(|m| entry.text.contains(m));
        has_sponsored_sentinel(&entry.text)
            && (has_ad_link || !entry.images.is_empty() || has_ad_info)
            && entry.text.chars().count() < MAX_FALLBACK_CHARS
    });
    let entries = unique_entries(candidates);
    if !entries.is_empty() {
        tracing::debug!(count = entries.len(), "matched ad containers by sponsored sentinel");
    }
    entries
}

/// Keeps entries longer than 20 characters whose first 100 characters have
/// not been seen before.
fn unique_entries(entries: impl Iterator<Item = RawEntry>) -> Vec<RawEntry> {
    let mut seen: HashSet<String> = HashSet::new();
    entries
        .filter(|entry| {
            let key: String = entry.text.chars().take(UNIQUE_KEY_CHARS).collect();
            key.chars().count() > MIN_ENTRY_CHARS && seen.insert(key)
        })
        .collect()
}

/// Rendered text of `element`: inline runs joined with single spaces,
/// one line per block element.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut lines = LineBuilder::default();
    collect_lines(element, &mut lines);
    lines.finish()
}

#[derive(Default)]
struct LineBuilder {
    lines: Vec<String>,
    current: String,
}

impl LineBuilder {
    fn push_text(&mut self, text: &str) {
        for word in text.split_whitespace() {
            if !self.current.is_empty() {
                self.current.push(' ');
            }
            self.current.push_str(word);
        }
    }

    fn break_line(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
    }

    fn finish(mut self) -> String {
        self.break_line();
        self.lines.join("\n")
    }
}

fn collect_lines(element: ElementRef<'_>, out: &mut LineBuilder) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_text(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            if HIDDEN_ELEMENTS.contains(&name) {
                continue;
            }
            let block = BLOCK_ELEMENTS.contains(&name);
            if block {
                out.break_line();
            }
            collect_lines(child_element, out);
            if block {
                out.break_line();
            }
        }
    }
}

fn direct_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|child| child.value().as_text())
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn raw_entry(element: ElementRef<'_>) -> RawEntry {
    let links = selector("a[href]")
        .map(|sel| {
            element
                .select(&sel)
                .filter_map(|a| {
                    a.value().attr("href").map(|href| RawLink {
                        href: href.to_owned(),
                        text: visible_text(a).replace('\n', " "),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let images = selector("img[src]")
        .map(|sel| {
            element
                .select(&sel)
                .filter_map(|img| img.value().attr("src").map(str::to_owned))
                .collect()
        })
        .unwrap_or_default();

    let blocks = selector("p, div")
        .map(|sel| {
            element
                .select(&sel)
                .filter(|block| {
                    block.value().name() == "p"
                        || direct_text(*block).chars().count() > MIN_BLOCK_DIRECT_CHARS
                })
                .map(|block| visible_text(block).replace('\n', " "))
                .collect()
        })
        .unwrap_or_default();

    RawEntry {
        text: visible_text(element),
        links,
        images,
        blocks,
    }
}
