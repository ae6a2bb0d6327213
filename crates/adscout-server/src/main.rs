mod api;
mod middleware;

use std::sync::Arc;

use adscout_core::Lexicon;
use adscout_scraper::{AdLibraryProvider, ClientSettings, ResolveOptions};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = adscout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let lexicon = match &config.lexicon_path {
        Some(path) => {
            let lexicon = adscout_core::load_lexicon(path)?;
            tracing::info!(path = %path.display(), "loaded lexicon override");
            lexicon
        }
        None => Lexicon::default(),
    };

    let shutdown = CancellationToken::new();
    let state = AppState {
        sources: Arc::new(AdLibraryProvider::new(ClientSettings::from_config(&config))),
        lexicon: Arc::new(lexicon),
        options: ResolveOptions::from_config(&config),
        shutdown: shutdown.clone(),
    };
    let app = build_app(
        state,
        RateLimitState::per_minute(config.api_rate_limit_per_minute),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "adscout server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;
    Ok(())
}

/// Waits for ctrl-c or SIGTERM, then cancels in-flight resolutions so the
/// server can drain with partial results.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
    shutdown.cancel();
}
