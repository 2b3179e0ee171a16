mod console;
mod logging;

use anyhow::Context;
use console::ConsoleDisplay;
use std::sync::Arc;
use std::time::Duration;
use stsconfig::init_config;
use stscovers::CoverClient;
use stsopenai::OpenAiClient;
use stsspotify::SpotifyClient;
use ststunebat::TunebatClient;
use stswatcher::{Dispatcher, Display, Poller, WatcherConfigExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ========== PHASE 1: CONFIGURATION ==========
    let config = init_config("").context("Failed to load the configuration")?;
    logging::init_logging(&config);

    info!("🎧 Starting Spotistats...");

    let settings = config
        .watcher_settings()
        .context("Invalid watcher settings")?;
    let timeout = Duration::from_secs(config.get_http_timeout_secs()?);

    info!(
        "⏱️  Polling every {:?} (backoff up to {:?})",
        settings.poll_interval, settings.backoff_max
    );

    // ========== PHASE 2: CLIENTS ==========
    let spotify = SpotifyClient::from_config(&config)
        .context("Cannot reach Spotify without an access token")?;
    info!("✅ Spotify client ready");

    let display = Arc::new(ConsoleDisplay::stdout());
    let covers = CoverClient::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build the cover client")?;

    let mut dispatcher = Dispatcher::new(display.clone()).with_covers(Arc::new(covers));

    if settings.stats_enabled {
        let tunebat = TunebatClient::from_config(&config)
            .context("Failed to build the Tunebat client")?;
        dispatcher = dispatcher.with_stats(Arc::new(tunebat));
        info!("✅ Track stats enabled");
    } else {
        info!("Track stats disabled");
    }

    if settings.suggestions_enabled {
        match OpenAiClient::from_config(&config) {
            Ok(openai) => {
                info!("✅ AI suggestions enabled ({})", openai.model());
                dispatcher = dispatcher.with_suggestions(Arc::new(openai));
            }
            Err(e) => warn!("AI suggestions disabled: {:#}", e),
        }
    } else {
        info!("AI suggestions disabled");
    }

    // ========== PHASE 3: WATCH ==========
    display
        .show_idle()
        .context("Cannot write to the console")?;

    let poller = Poller::new(Arc::new(spotify), dispatcher, settings);
    let cancel = CancellationToken::new();
    let watcher = tokio::spawn(poller.run(cancel.clone()));

    info!("Press Ctrl+C to stop...");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    info!("🛑 Shutting down...");
    cancel.cancel();
    watcher.await.context("Watcher task panicked")?;

    info!("👋 Bye");
    Ok(())
}
