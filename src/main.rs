use std::process::ExitCode;

use tracing::{error, info};

use feedsync::{
    synchronize_channels, ChannelRepository, Config, Database, HttpFeedSource, SyncOptions,
    SyncOutcome,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = feedsync::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        feedsync::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {e}");
        return ExitCode::FAILURE;
    }

    info!("feedsync - RSS/Atom channel synchronizer");

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database {}: {e}", config.database.path);
            return ExitCode::FAILURE;
        }
    };

    let channels = match ChannelRepository::new(db.pool()).list_all().await {
        Ok(channels) => channels,
        Err(e) => {
            error!("Failed to list channels: {e}");
            return ExitCode::FAILURE;
        }
    };

    let source = match HttpFeedSource::new(&config.fetch) {
        Ok(source) => source,
        Err(e) => {
            error!("Failed to create feed source: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("Synchronizing {} channels", channels.len());
    let options = SyncOptions::from_config(&config.sync);
    let results = synchronize_channels(
        &db,
        &source,
        channels,
        &options,
        config.sync.max_concurrent_channels,
    )
    .await;

    let mut failed = 0;
    for result in &results {
        match &result.result {
            Ok(SyncOutcome::NoUpdateRequired) => {
                info!("Channel {}: no update required", result.channel_id);
            }
            Ok(SyncOutcome::UpdateCompleted(report)) => {
                info!(
                    "Channel {}: update completed, {} new articles",
                    result.channel_id, report.created
                );
            }
            Err(e) => {
                error!("Channel {}: {e}", result.channel_id);
                failed += 1;
            }
        }
    }

    info!(
        "Synchronized {} channels, {} failed",
        results.len() - failed,
        failed
    );

    if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
