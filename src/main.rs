//! ddcvolume - Monitor volume control over DDC/CI
//!
//! CLI entry point that dispatches to the requested action.

use clap::Parser;
use console::style;
use ddcvolume::cli::{Action, Cli};
use ddcvolume::config::ConfigManager;
use ddcvolume::error::DdcVolumeResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> DdcVolumeResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("ddcvolume=warn"),
        1 => EnvFilter::new("ddcvolume=info"),
        _ => EnvFilter::new("ddcvolume=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let config_manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    debug!("Loading config from {}", config_manager.path().display());

    let mut config = config_manager.load().await?;
    cli.apply_overrides(&mut config);

    match cli.action() {
        Action::Set(expr) => ddcvolume::cli::commands::set(&expr, &config).await,
        Action::Get => ddcvolume::cli::commands::get(&config).await,
        Action::Refresh => ddcvolume::cli::commands::refresh(&config).await,
    }
}
