//! Subcommand handlers. Each one returns the JSON document the matching
//! `/api` route would answer with.

use adscout_core::Lexicon;
use adscout_scraper::{
    advertiser_summary, clamp_max_results, competition_for, search_by_location, AdSource,
    EstablishmentResolver, ResolveOptions,
};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::Commands;

/// Runs one subcommand against `source`.
///
/// # Errors
///
/// Returns an error if a search, competition or advertiser lookup cannot
/// fetch from the source. Address resolution never fails; it reports a
/// not-found result instead.
pub(crate) async fn run_command(
    command: Commands,
    source: &dyn AdSource,
    lexicon: &Lexicon,
    options: ResolveOptions,
    cancel: &CancellationToken,
) -> anyhow::Result<Value> {
    let deadline = options.fetch_deadline;

    let output = match command {
        Commands::Check { address } => {
            let result = EstablishmentResolver::new(source, lexicon, options)
                .resolve(&address, cancel)
                .await;
            serde_json::to_value(result)?
        }
        Commands::HasAds { address } => {
            let result = EstablishmentResolver::new(source, lexicon, options)
                .resolve(&address, cancel)
                .await;
            json!({ "has_ads": result.has_ads })
        }
        Commands::Search {
            location,
            business_type,
            max_results,
        } => {
            let found = search_by_location(
                source,
                &location,
                &business_type,
                clamp_max_results(max_results),
                deadline,
            )
            .await?;
            serde_json::to_value(found)?
        }
        Commands::Competition {
            location,
            business_type,
        } => serde_json::to_value(
            competition_for(source, &location, &business_type, deadline).await?,
        )?,
        Commands::Advertiser { name } => {
            serde_json::to_value(advertiser_summary(source, &name, lexicon, deadline).await?)?
        }
    };

    Ok(output)
}
