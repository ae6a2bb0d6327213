pub mod address;
pub mod advertiser;
pub mod client;
pub mod competition;
pub mod dedup;
pub mod error;
pub mod extract;
pub mod matching;
pub(crate) mod rate_limit;
pub mod resolver;
pub mod search;
pub mod source;
pub mod strategy;

pub use address::parse_address;
pub use advertiser::{advertiser_summary, summarize_advertiser};
pub use client::{AdLibraryClient, AdLibraryProvider, ClientSettings};
pub use competition::{analyze_competition, competition_for};
pub use dedup::{dedup_key, dedup_records, Deduplicator};
pub use error::{AddressUnparseable, ScraperError};
pub use extract::extract_record;
pub use matching::{is_matching, match_confidence};
pub use resolver::{EstablishmentResolver, ResolveOptions};
pub use search::{clamp_max_results, fetch_records, search_by_location, LocationSearch};
pub use source::{AdSource, FixtureAdSource, RawEntry, RawLink, SourceProvider};
pub use strategy::{plan_strategies, SearchStrategy};
