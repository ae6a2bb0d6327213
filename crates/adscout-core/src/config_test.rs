use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "ADSCOUT_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:5000");
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.lexicon_path.is_none());
    assert_eq!(cfg.source_base_url, "https://www.facebook.com/ads/library/");
    assert_eq!(cfg.source_country, "BR");
    assert_eq!(cfg.scraper_request_timeout_secs, 30);
    assert!(cfg.scraper_user_agent.starts_with("Mozilla/5.0"));
    assert_eq!(cfg.scraper_min_delay_ms, 1000);
    assert_eq!(cfg.scraper_max_delay_ms, 3000);
    assert_eq!(cfg.scraper_max_retries, 3);
    assert_eq!(cfg.scraper_retry_backoff_base_secs, 2);
    assert_eq!(cfg.fetch_deadline_secs, 90);
    assert_eq!(cfg.strategy_max_results, 20);
    assert_eq!(cfg.api_rate_limit_per_minute, 120);
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("ADSCOUT_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ADSCOUT_BIND_ADDR"),
        "expected InvalidEnvVar(ADSCOUT_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_reads_lexicon_path() {
    let mut map = HashMap::new();
    map.insert("ADSCOUT_LEXICON_PATH", "./config/lexicon.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.lexicon_path.as_deref(),
        Some(std::path::Path::new("./config/lexicon.yaml"))
    );
}

#[test]
fn build_app_config_blank_lexicon_path_is_none() {
    let mut map = HashMap::new();
    map.insert("ADSCOUT_LEXICON_PATH", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.lexicon_path.is_none());
}

#[test]
fn build_app_config_rejects_non_http_source_url() {
    let mut map = HashMap::new();
    map.insert("ADSCOUT_SOURCE_BASE_URL", "ftp://ads.example.com/");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ADSCOUT_SOURCE_BASE_URL"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_uppercases_country() {
    let mut map = HashMap::new();
    map.insert("ADSCOUT_SOURCE_COUNTRY", "pt");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.source_country, "PT");
}

#[test]
fn build_app_config_rejects_long_country() {
    let mut map = HashMap::new();
    map.insert("ADSCOUT_SOURCE_COUNTRY", "BRA");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ADSCOUT_SOURCE_COUNTRY"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_inverted_delay_bounds() {
    let mut map = HashMap::new();
    map.insert("ADSCOUT_SCRAPER_MIN_DELAY_MS", "5000");
    map.insert("ADSCOUT_SCRAPER_MAX_DELAY_MS", "100");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ADSCOUT_SCRAPER_MIN_DELAY_MS"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_accepts_zero_delay() {
    let mut map = HashMap::new();
    map.insert("ADSCOUT_SCRAPER_MIN_DELAY_MS", "0");
    map.insert("ADSCOUT_SCRAPER_MAX_DELAY_MS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.scraper_min_delay_ms, 0);
    assert_eq!(cfg.scraper_max_delay_ms, 0);
}

#[test]
fn build_app_config_rejects_zero_deadline() {
    let mut map = HashMap::new();
    map.insert("ADSCOUT_FETCH_DEADLINE_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ADSCOUT_FETCH_DEADLINE_SECS"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_scraper_max_retries_invalid() {
    let mut map = HashMap::new();
    map.insert("ADSCOUT_SCRAPER_MAX_RETRIES", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ADSCOUT_SCRAPER_MAX_RETRIES"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_strategy_max_results_override() {
    let mut map = HashMap::new();
    map.insert("ADSCOUT_STRATEGY_MAX_RESULTS", "35");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.strategy_max_results, 35);
}
