use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Optional YAML file replacing the built-in city/neighborhood/category lists.
    pub lexicon_path: Option<PathBuf>,
    /// Search page of the ad library, including the trailing slash.
    pub source_base_url: String,
    /// Two-letter country code sent with every ad-library search.
    pub source_country: String,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    /// Lower bound of the randomized pause taken before each outbound request.
    pub scraper_min_delay_ms: u64,
    /// Upper bound of the randomized pause taken before each outbound request.
    pub scraper_max_delay_ms: u64,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_secs: u64,
    /// Overall deadline for one strategy fetch, retries included.
    pub fetch_deadline_secs: u64,
    /// Raw entries requested per resolution strategy.
    pub strategy_max_results: usize,
    pub api_rate_limit_per_minute: usize,
}
