//! Maps address → "does this establishment run ads right now?".
//!
//! [`EstablishmentResolver::resolve`] walks an explicit state machine:
//!
//! ```text
//! Parsing ─┬─> ParseFailed ────────────────────────────┐
//!          └─> Strategizing ─> Searching(i) ─> Scoring ─┴─> Done
//! ```
//!
//! Searching advances one strategy per step and stops at the first strategy
//! that yields a match, when strategies run out, or on cancellation. Fetch
//! failures and deadlines skip the strategy; nothing escapes as an error.

use std::time::Duration;

use adscout_core::{
    AppConfig, EstablishmentDescriptor, Lexicon, MatchCandidate, ResolutionResult,
};
use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::address::parse_address;
use crate::dedup::Deduplicator;
use crate::error::ScraperError;
use crate::matching::{is_matching, match_confidence};
use crate::search::{fetch_raw, records_from_entries};
use crate::source::AdSource;
use crate::strategy::{plan_strategies, SearchStrategy};

const MAX_REPORTED_MATCHES: usize = 5;
const PARSE_FAILED_MESSAGE: &str = "could not extract establishment details from the address";

/// Per-resolution limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Raw entries requested per strategy.
    pub strategy_max_results: usize,
    /// Upper bound on each strategy fetch, retries included.
    pub fetch_deadline: Duration,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            strategy_max_results: 20,
            fetch_deadline: Duration::from_secs(90),
        }
    }
}

impl ResolveOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            strategy_max_results: config.strategy_max_results,
            fetch_deadline: Duration::from_secs(config.fetch_deadline_secs),
        }
    }
}

struct SearchProgress {
    target: EstablishmentDescriptor,
    strategies: Vec<SearchStrategy>,
    next: usize,
    dedup: Deduplicator,
    pool: Vec<MatchCandidate>,
    total_ads_searched: usize,
}

enum ResolveState {
    Parsing,
    ParseFailed,
    Strategizing(EstablishmentDescriptor),
    Searching(SearchProgress),
    Scoring(SearchProgress),
    Done(ResolutionResult),
}

/// Resolves one maps address against one ad-source session.
pub struct EstablishmentResolver<'a> {
    source: &'a dyn AdSource,
    lexicon: &'a Lexicon,
    options: ResolveOptions,
}

impl<'a> EstablishmentResolver<'a> {
    #[must_use]
    pub fn new(source: &'a dyn AdSource, lexicon: &'a Lexicon, options: ResolveOptions) -> Self {
        Self {
            source,
            lexicon,
            options,
        }
    }

    /// Runs the full pipeline. Always returns a well-formed result.
    pub async fn resolve(&self, maps_address: &str, cancel: &CancellationToken) -> ResolutionResult {
        let mut state = ResolveState::Parsing;
        loop {
            state = match state {
                ResolveState::Parsing => match parse_address(maps_address, self.lexicon) {
                    Ok(target) => ResolveState::Strategizing(target),
                    Err(e) => {
                        tracing::warn!(address = maps_address, error = %e, "address parse failed");
                        ResolveState::ParseFailed
                    }
                },
                ResolveState::ParseFailed => ResolveState::Done(ResolutionResult::not_found(
                    maps_address,
                    PARSE_FAILED_MESSAGE,
                )),
                ResolveState::Strategizing(target) => {
                    let strategies = plan_strategies(&target);
                    tracing::debug!(
                        name = %target.name,
                        city = %target.city,
                        neighborhood = %target.neighborhood,
                        category = %target.category,
                        strategies = strategies.len(),
                        "planned search strategies"
                    );
                    ResolveState::Searching(SearchProgress {
                        target,
                        strategies,
                        next: 0,
                        dedup: Deduplicator::new(),
                        pool: Vec::new(),
                        total_ads_searched: 0,
                    })
                }
                ResolveState::Searching(progress) => self.search_step(progress, cancel).await,
                ResolveState::Scoring(progress) => {
                    ResolveState::Done(finish(progress, maps_address))
                }
                ResolveState::Done(result) => return result,
            };
        }
    }

    async fn search_step(
        &self,
        mut progress: SearchProgress,
        cancel: &CancellationToken,
    ) -> ResolveState {
        if progress.next >= progress.strategies.len() {
            return ResolveState::Scoring(progress);
        }
        if cancel.is_cancelled() {
            tracing::info!(
                remaining = progress.strategies.len() - progress.next,
                "resolution cancelled, scoring what was found"
            );
            return ResolveState::Scoring(progress);
        }

        let strategy = progress.strategies[progress.next].clone();
        progress.next += 1;

        tracing::info!(strategy = %strategy.kind, query = %strategy.query, "searching");

        let fetched = tokio::select! {
            () = cancel.cancelled() => Err(ScraperError::Cancelled),
            result = fetch_raw(
                self.source,
                &strategy.query,
                self.options.strategy_max_results,
                self.options.fetch_deadline,
            ) => result,
        };

        let entries = match fetched {
            Ok(entries) => entries,
            Err(ScraperError::Cancelled) => {
                tracing::info!(strategy = %strategy.kind, "fetch cancelled");
                return ResolveState::Scoring(progress);
            }
            Err(e) => {
                tracing::warn!(
                    strategy = %strategy.kind,
                    query = %strategy.query,
                    error = %e,
                    "strategy fetch failed, skipping"
                );
                return ResolveState::Searching(progress);
            }
        };

        let records = records_from_entries(&entries, &mut progress.dedup);
        progress.total_ads_searched += records.len();

        for record in records {
            if is_matching(&record, &progress.target) {
                let confidence = match_confidence(&record, &progress.target);
                progress.pool.push(MatchCandidate {
                    record,
                    match_strategy: strategy.kind,
                    match_confidence: confidence,
                });
            }
        }

        tracing::debug!(
            strategy = %strategy.kind,
            raw = entries.len(),
            matches = progress.pool.len(),
            "strategy complete"
        );

        if progress.pool.is_empty() {
            ResolveState::Searching(progress)
        } else {
            ResolveState::Scoring(progress)
        }
    }
}

fn finish(progress: SearchProgress, maps_address: &str) -> ResolutionResult {
    let SearchProgress {
        target,
        mut pool,
        total_ads_searched,
        ..
    } = progress;

    // Stable: equal confidences keep discovery order.
    pool.sort_by(|a, b| b.match_confidence.total_cmp(&a.match_confidence));
    let total_matching_ads = pool.len();
    pool.truncate(MAX_REPORTED_MATCHES);

    tracing::info!(
        address = maps_address,
        total_matching_ads,
        total_ads_searched,
        "resolution complete"
    );

    ResolutionResult {
        establishment_found: total_matching_ads > 0,
        has_ads: total_matching_ads > 0,
        total_matching_ads,
        total_ads_searched,
        matching_ads: pool,
        establishment_info: target,
        maps_address: maps_address.to_string(),
        analysis_date: Utc::now(),
        error: None,
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
