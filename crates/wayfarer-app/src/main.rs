//! Wayfarer application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Open the SQLite history database
//! 3. Either run a one-shot command or start the axum REST API server

mod cli;
mod commands;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;

use wayfarer_advisory::AdvisoryEngine;
use wayfarer_api::state::AppState;
use wayfarer_core::config::WayfarerConfig;
use wayfarer_core::error::WayfarerError;
use wayfarer_core::types::RouteHints;
use wayfarer_storage::{Database, HistoryRepository};

use cli::{CliArgs, Command};

const DB_FILE: &str = "wayfarer.db";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing starts since it carries the log level.
    let config_file = args.resolve_config_path();
    let (mut config, load_error) = load_config(&config_file);
    args.apply_overrides(&mut config);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(e) = load_error {
        tracing::warn!(path = %config_file.display(), error = %e, "Failed to load config, using defaults");
    }
    config.validate()?;

    let mut stdout = std::io::stdout();
    match args.command() {
        Command::Serve => serve(config).await?,
        Command::Config => commands::print_config(&config, &mut stdout)?,
        Command::Ask {
            query,
            destination,
            origin,
            no_save,
        } => {
            let engine = AdvisoryEngine::new(&config.advisory);
            let hints = RouteHints::new(destination, origin);
            let repo = if no_save {
                None
            } else {
                Some(open_history(&config)?)
            };
            commands::ask(&engine, repo.as_ref(), &query, &hints, &mut stdout)?;
        }
        Command::History { limit } => {
            let limit = limit
                .unwrap_or(config.history.default_limit)
                .min(config.history.max_limit);
            commands::history(&open_history(&config)?, limit, &mut stdout)?;
        }
        Command::Show { id } => commands::show(&open_history(&config)?, id, &mut stdout)?,
        Command::Delete { id } => commands::delete(&open_history(&config)?, id, &mut stdout)?,
        Command::Clear => commands::clear(&open_history(&config)?, &mut stdout)?,
    }

    Ok(())
}

/// Load the config file if present. A missing file is not an error; a
/// broken one is reported once logging is up.
fn load_config(path: &Path) -> (WayfarerConfig, Option<WayfarerError>) {
    if !path.exists() {
        return (WayfarerConfig::default(), None);
    }
    match WayfarerConfig::load(path) {
        Ok(config) => (config, None),
        Err(e) => (WayfarerConfig::default(), Some(e)),
    }
}

fn open_database(config: &WayfarerConfig) -> Result<Database, WayfarerError> {
    let data_dir = cli::expand_home(&config.general.data_dir);
    let db_path = data_dir.join(DB_FILE);
    let db = Database::new(&db_path)?;
    tracing::info!(path = %db_path.display(), "History database opened");
    Ok(db)
}

fn open_history(config: &WayfarerConfig) -> Result<HistoryRepository, WayfarerError> {
    Ok(HistoryRepository::new(Arc::new(open_database(config)?)))
}

async fn serve(config: WayfarerConfig) -> Result<(), WayfarerError> {
    tracing::info!("Starting Wayfarer v{}", env!("CARGO_PKG_VERSION"));

    let db = Arc::new(open_database(&config)?);
    let state = AppState::new(config.clone(), db);

    tracing::info!(
        fallback = ?config.advisory.fallback,
        origins = ?config.server.allowed_origins,
        "API server configured"
    );

    wayfarer_api::start_server(&config, state).await
}
