use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it from a
/// `HashMap` without `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("ADSCOUT_ENV", "development"))?;
    let bind_addr = parse_addr("ADSCOUT_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default("ADSCOUT_LOG_LEVEL", "info");
    let lexicon_path = lookup("ADSCOUT_LEXICON_PATH")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    let source_base_url = or_default(
        "ADSCOUT_SOURCE_BASE_URL",
        "https://www.facebook.com/ads/library/",
    );
    if !source_base_url.starts_with("http://") && !source_base_url.starts_with("https://") {
        return Err(invalid(
            "ADSCOUT_SOURCE_BASE_URL",
            format!("expected an http(s) URL, got '{source_base_url}'"),
        ));
    }

    let source_country = or_default("ADSCOUT_SOURCE_COUNTRY", "BR").to_uppercase();
    if source_country.len() != 2 || !source_country.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid(
            "ADSCOUT_SOURCE_COUNTRY",
            format!("expected a two-letter country code, got '{source_country}'"),
        ));
    }

    let scraper_request_timeout_secs = parse_u64("ADSCOUT_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default("ADSCOUT_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let scraper_min_delay_ms = parse_u64("ADSCOUT_SCRAPER_MIN_DELAY_MS", "1000")?;
    let scraper_max_delay_ms = parse_u64("ADSCOUT_SCRAPER_MAX_DELAY_MS", "3000")?;
    if scraper_min_delay_ms > scraper_max_delay_ms {
        return Err(invalid(
            "ADSCOUT_SCRAPER_MIN_DELAY_MS",
            format!(
                "min delay {scraper_min_delay_ms}ms exceeds max delay {scraper_max_delay_ms}ms"
            ),
        ));
    }
    let scraper_max_retries = parse_u32("ADSCOUT_SCRAPER_MAX_RETRIES", "3")?;
    let scraper_retry_backoff_base_secs =
        parse_u64("ADSCOUT_SCRAPER_RETRY_BACKOFF_BASE_SECS", "2")?;

    let fetch_deadline_secs = parse_u64("ADSCOUT_FETCH_DEADLINE_SECS", "90")?;
    if fetch_deadline_secs == 0 {
        return Err(invalid(
            "ADSCOUT_FETCH_DEADLINE_SECS",
            "deadline must be at least one second".to_string(),
        ));
    }
    let strategy_max_results = parse_usize("ADSCOUT_STRATEGY_MAX_RESULTS", "20")?;
    let api_rate_limit_per_minute = parse_usize("ADSCOUT_API_RATE_LIMIT_PER_MINUTE", "120")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        lexicon_path,
        source_base_url,
        source_country,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_min_delay_ms,
        scraper_max_delay_ms,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
        fetch_deadline_secs,
        strategy_max_results,
        api_rate_limit_per_minute,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ADSCOUT_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
