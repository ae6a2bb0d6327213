pub mod ads;
pub mod app_config;
pub mod config;
pub mod error;
pub mod lexicon;

pub use ads::{
    AdRecord, AdvertiserCount, AdvertiserSummary, CompetitionAnalysis, CompetitionLevel,
    EstablishmentDescriptor, MatchCandidate, MatchStrategy, ResolutionResult,
};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use lexicon::{load_lexicon, CategoryKeywords, Lexicon};
