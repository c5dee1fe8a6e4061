//! Headless order notifier.
//!
//! Loads the configuration, polls the order feed on a timer and logs every
//! notification it would show, until interrupted with Ctrl-C.

use clap::Parser;
use order_notifier::clients::{LogPresenter, TokenStore};
use order_notifier::config::NotifierConfig;
use order_notifier::lifecycle::{setup_tracing, NotifierSystem};
use order_notifier::notifier::StartOutcome;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Command-line arguments for the notifier.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Session token to store before polling starts
    #[arg(long, env = "ORDER_NOTIFIER_TOKEN")]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_tracing(&args.log_level);

    let config = NotifierConfig::from_file(&args.config).await?;
    info!(config = %args.config.display(), "Loaded configuration");

    let system = NotifierSystem::from_config(&config, Arc::new(LogPresenter))?;

    if let Some(token) = args.token.as_deref() {
        system.token_store.save(token).await?;
        info!("Session token stored");
    }

    match system.notifier.start(config.interval()).await? {
        StartOutcome::PermissionDenied => warn!("Notifications not permitted, not polling"),
        outcome => info!(
            ?outcome,
            interval_minutes = config.notifier.interval_minutes,
            "Polling"
        ),
    }

    // First check right away instead of waiting a full interval.
    system.notifier.check_now().await?;

    tokio::signal::ctrl_c().await?;
    info!("Interrupted");

    system.notifier.stop().await?;
    system.shutdown().await?;
    Ok(())
}
