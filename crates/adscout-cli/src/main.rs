mod lookup;

use std::path::PathBuf;

use adscout_core::Lexicon;
use adscout_scraper::{
    AdLibraryProvider, ClientSettings, FixtureAdSource, ResolveOptions, SourceProvider,
};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "adscout-cli")]
#[command(about = "Check establishments, locations and advertisers for active ads")]
struct Cli {
    /// Replay a recorded fixture file instead of querying the live ad library
    #[arg(long, global = true, value_name = "PATH")]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a maps address and list its matching ads
    Check { address: String },
    /// Print only whether a maps address has active ads
    HasAds { address: String },
    /// Search ads for a business type in a location
    Search {
        #[arg(long)]
        location: String,
        #[arg(long)]
        business_type: String,
        /// Clamped to 1..=200; defaults to 50
        #[arg(long)]
        max_results: Option<i64>,
    },
    /// Summarize advertiser competition for a business type in a location
    Competition {
        #[arg(long)]
        location: String,
        #[arg(long)]
        business_type: String,
    },
    /// Summarize one advertiser's active ads
    Advertiser { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = adscout_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let lexicon = match &config.lexicon_path {
        Some(path) => adscout_core::load_lexicon(path)?,
        None => Lexicon::default(),
    };

    let provider: Box<dyn SourceProvider> = match &cli.fixture {
        Some(path) => {
            tracing::info!(path = %path.display(), "replaying fixture");
            Box::new(FixtureAdSource::load(path)?)
        }
        None => Box::new(AdLibraryProvider::new(ClientSettings::from_config(&config))),
    };
    let session = provider.open_session()?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, finishing with partial results");
            on_interrupt.cancel();
        }
    });

    let output = lookup::run_command(
        cli.command,
        session.as_ref(),
        &lexicon,
        ResolveOptions::from_config(&config),
        &cancel,
    )
    .await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
