use std::collections::HashMap;
use std::sync::Mutex;

use adscout_core::MatchStrategy;
use async_trait::async_trait;

use super::*;
use crate::source::RawEntry;

const BALADA: &str = "Balada Mix - R. Barata Ribeiro, 111 - Copacabana, Rio de Janeiro - RJ";

enum Scripted {
    Entries(Vec<RawEntry>),
    Fail,
    Stall,
}

/// Answers per query from a script and records every query it receives.
#[derive(Default)]
struct ScriptedSource {
    script: HashMap<String, Scripted>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSource {
    fn with(mut self, query: &str, answer: Scripted) -> Self {
        self.script.insert(query.to_string(), answer);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AdSource for ScriptedSource {
    async fn fetch(&self, query: &str, max_results: usize) -> Result<Vec<RawEntry>, ScraperError> {
        self.calls.lock().unwrap().push(query.to_string());
        match self.script.get(query) {
            Some(Scripted::Entries(entries)) => {
                Ok(entries.iter().take(max_results).cloned().collect())
            }
            Some(Scripted::Fail) => Err(ScraperError::UnexpectedStatus {
                status: 500,
                url: "https://ads.example.com/".to_string(),
            }),
            Some(Scripted::Stall) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(vec![])
            }
            None => Ok(vec![]),
        }
    }
}

fn card(advertiser: &str, body: &str) -> RawEntry {
    RawEntry {
        text: format!("{advertiser}\nPatrocinado\n{body}"),
        ..RawEntry::default()
    }
}

fn options() -> ResolveOptions {
    ResolveOptions {
        strategy_max_results: 20,
        fetch_deadline: Duration::from_secs(5),
    }
}

async fn resolve(source: &ScriptedSource, address: &str) -> ResolutionResult {
    let lexicon = Lexicon::default();
    EstablishmentResolver::new(source, &lexicon, options())
        .resolve(address, &CancellationToken::new())
        .await
}

fn assert_consistent(result: &ResolutionResult) {
    assert_eq!(result.has_ads, result.total_matching_ads > 0);
    assert_eq!(result.establishment_found, result.has_ads);
    assert!(result.matching_ads.len() <= 5);
    assert!(result
        .matching_ads
        .windows(2)
        .all(|w| w[0].match_confidence >= w[1].match_confidence));
}

#[tokio::test]
async fn first_strategy_match_stops_search() {
    let source = ScriptedSource::default().with(
        "Balada Mix Rio De Janeiro",
        Scripted::Entries(vec![
            card("Balada Mix", "Sexta tem open bar em Copacabana"),
            card("Outra Casa", "Promoção de pizza no Méier hoje"),
        ]),
    );

    let result = resolve(&source, BALADA).await;

    assert_consistent(&result);
    assert!(result.has_ads);
    assert_eq!(result.total_matching_ads, 1);
    assert_eq!(result.total_ads_searched, 2);
    assert_eq!(result.matching_ads[0].match_strategy, MatchStrategy::NameCity);
    assert_eq!(result.matching_ads[0].record.advertiser_name, "Balada Mix");
    assert!((result.matching_ads[0].match_confidence - 0.75).abs() < 1e-9);
    assert_eq!(result.establishment_info.name, "Balada Mix");
    assert_eq!(result.maps_address, BALADA);
    assert!(result.error.is_none());
    assert_eq!(source.calls(), vec!["Balada Mix Rio De Janeiro"]);
}

#[tokio::test]
async fn falls_through_to_next_strategy_and_dedups_across_strategies() {
    let repeated = card("Outra Casa", "Promoção de pizza no Méier hoje");
    let source = ScriptedSource::default()
        .with(
            "Balada Mix Rio De Janeiro",
            Scripted::Entries(vec![repeated.clone()]),
        )
        .with(
            "Balada Mix Copacabana",
            Scripted::Entries(vec![repeated, card("BALADA MIX", "Nova festa na sexta")]),
        );

    let result = resolve(&source, BALADA).await;

    assert_consistent(&result);
    assert_eq!(result.total_ads_searched, 2);
    assert_eq!(result.total_matching_ads, 1);
    assert_eq!(
        result.matching_ads[0].match_strategy,
        MatchStrategy::NameNeighborhood
    );
    assert_eq!(
        source.calls(),
        vec!["Balada Mix Rio De Janeiro", "Balada Mix Copacabana"]
    );
}

#[tokio::test]
async fn name_only_with_empty_fetch_yields_zeros() {
    let source = ScriptedSource::default();

    let result = resolve(&source, "XYZ123, sem cidade").await;

    assert_consistent(&result);
    assert_eq!(result.establishment_info.name, "XYZ123");
    assert!(!result.has_ads);
    assert_eq!(result.total_matching_ads, 0);
    assert_eq!(result.total_ads_searched, 0);
    assert!(result.matching_ads.is_empty());
    assert_eq!(source.calls(), vec!["XYZ123"]);
}

#[tokio::test]
async fn empty_address_is_not_found_without_fetching() {
    let source = ScriptedSource::default();

    let result = resolve(&source, "   ").await;

    assert!(!result.establishment_found);
    assert!(!result.has_ads);
    assert!(result.error.is_some());
    assert_eq!(result.establishment_info.name, "");
    assert_eq!(result.establishment_info.original_address, "   ");
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn zero_strategies_means_no_external_calls() {
    let source = ScriptedSource::default();

    let result = resolve(&source, "qualquer coisa sem separador").await;

    assert!(!result.has_ads);
    assert_eq!(result.total_ads_searched, 0);
    assert!(result.error.is_none());
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn failing_strategies_are_skipped_without_error() {
    let source = ScriptedSource::default()
        .with("Balada Mix Rio De Janeiro", Scripted::Fail)
        .with("Balada Mix Copacabana", Scripted::Fail)
        .with("Balada Mix", Scripted::Fail);

    let result = resolve(&source, BALADA).await;

    assert_consistent(&result);
    assert!(!result.has_ads);
    assert_eq!(result.total_ads_searched, 0);
    assert!(result.error.is_none());
    assert_eq!(source.calls().len(), 3);
}

#[tokio::test]
async fn deadline_skips_to_next_strategy() {
    let source = ScriptedSource::default()
        .with("Balada Mix Rio De Janeiro", Scripted::Stall)
        .with(
            "Balada Mix Copacabana",
            Scripted::Entries(vec![card("Balada Mix", "Open bar a noite toda")]),
        );
    let lexicon = Lexicon::default();
    let opts = ResolveOptions {
        strategy_max_results: 20,
        fetch_deadline: Duration::from_millis(50),
    };

    let result = EstablishmentResolver::new(&source, &lexicon, opts)
        .resolve(BALADA, &CancellationToken::new())
        .await;

    assert!(result.has_ads);
    assert_eq!(
        result.matching_ads[0].match_strategy,
        MatchStrategy::NameNeighborhood
    );
}

#[tokio::test]
async fn keeps_top_five_sorted_by_confidence() {
    let mut entries: Vec<RawEntry> = (0..6)
        .map(|i| card(&format!("Casa {i}"), &format!("Melhor balada {i} da cidade")))
        .collect();
    entries.push(card("Balada Mix", "Festa em Copacabana"));
    let source =
        ScriptedSource::default().with("Balada Mix Rio De Janeiro", Scripted::Entries(entries));

    let result = resolve(&source, BALADA).await;

    assert_consistent(&result);
    assert_eq!(result.total_matching_ads, 7);
    assert_eq!(result.matching_ads.len(), 5);
    assert_eq!(result.matching_ads[0].record.advertiser_name, "Balada Mix");
    // Ties keep discovery order.
    assert_eq!(result.matching_ads[1].record.advertiser_name, "Casa 0");
    assert_eq!(result.matching_ads[4].record.advertiser_name, "Casa 3");
}

#[tokio::test]
async fn cancelled_token_skips_all_fetches() {
    let source = ScriptedSource::default();
    let lexicon = Lexicon::default();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = EstablishmentResolver::new(&source, &lexicon, options())
        .resolve(BALADA, &cancel)
        .await;

    assert!(!result.has_ads);
    assert!(result.error.is_none());
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn cancellation_interrupts_inflight_fetch() {
    let source = ScriptedSource::default().with("Balada Mix Rio De Janeiro", Scripted::Stall);
    let lexicon = Lexicon::default();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let result = EstablishmentResolver::new(&source, &lexicon, options())
        .resolve(BALADA, &cancel)
        .await;

    assert!(!result.has_ads);
    assert_eq!(source.calls(), vec!["Balada Mix Rio De Janeiro"]);
}
