mod cli;

use anyhow::Result;
use chargewise::config::Config;
use chargewise::logging::init_logging;
use chargewise::persistence::PersistenceManager;
use clap::Parser;
use cli::{App, Args, Command};
use std::path::PathBuf;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (config, config_path) = match args.config {
        Some(path) => (Config::load_from(&path)?, path),
        None => Config::load()?,
    };

    init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
    info!(
        "Chargewise {} starting with {}",
        env!("APP_VERSION"),
        config_path.display()
    );

    // Battery settings are validated after the edit, so a broken file can be repaired
    if !matches!(args.command, Command::Battery(_)) {
        config.validate()?;
    }

    let state_path = args
        .state
        .unwrap_or_else(|| PathBuf::from(&config.state_file));
    let mut state = PersistenceManager::new(&state_path);
    state.load()?;

    let app = App {
        config,
        config_path,
        state,
    };
    if let Err(e) = app.run(args.command).await {
        error!("Command failed: {}", e);
        return Err(e);
    }
    Ok(())
}
