//! CLI argument definitions for the Wayfarer application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use wayfarer_core::config::WayfarerConfig;

/// Wayfarer - travel advisories from free-text questions.
#[derive(Parser, Debug)]
#[command(name = "wayfarer", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// API server port.
    #[arg(short = 'p', long = "port", global = true)]
    pub port: Option<u16>,

    /// API server bind address.
    #[arg(long = "host", global = true)]
    pub host: Option<String>,

    /// Data directory for the history database.
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the HTTP API server (default).
    Serve,

    /// Answer a travel question and print the advisory as JSON.
    Ask {
        /// The question, e.g. `travel from USA to Japan`.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Destination to use instead of the one in the question.
        #[arg(long)]
        destination: Option<String>,

        /// Origin to use instead of the one in the question.
        #[arg(long)]
        origin: Option<String>,

        /// Do not record the question in history.
        #[arg(long = "no-save")]
        no_save: bool,
    },

    /// List past questions, newest first.
    History {
        #[arg(short = 'n', long)]
        limit: Option<u64>,
    },

    /// Print one history entry.
    Show { id: i64 },

    /// Delete one history entry.
    Delete { id: i64 },

    /// Delete every history entry.
    Clear,

    /// Print the effective configuration as TOML.
    Config,
}

impl CliArgs {
    /// The command to run; `serve` when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }

    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > WAYFARER_CONFIG env var > ~/.wayfarer/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("WAYFARER_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Apply flag and `WAYFARER_*` environment overrides to a loaded config.
    pub fn apply_overrides(&self, config: &mut WayfarerConfig) {
        self.apply_overrides_with(config, |key| std::env::var(key).ok());
    }

    fn apply_overrides_with<F>(&self, config: &mut WayfarerConfig, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = self
            .port
            .or_else(|| env("WAYFARER_PORT").and_then(|v| v.parse().ok()))
        {
            config.server.port = port;
        }
        if let Some(host) = self.host.clone().or_else(|| env("WAYFARER_HOST")) {
            config.server.host = host;
        }
        if let Some(dir) = self
            .data_dir
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .or_else(|| env("WAYFARER_DATA_DIR"))
        {
            config.general.data_dir = dir;
        }
        if let Some(level) = self.log_level.clone().or_else(|| env("WAYFARER_LOG_LEVEL")) {
            config.general.log_level = level;
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    match home_dir() {
        Some(home) => home.join(".wayfarer").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

pub(crate) fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let home = std::env::var("USERPROFILE");
    #[cfg(not(target_os = "windows"))]
    let home = std::env::var("HOME");
    home.ok().map(PathBuf::from)
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match path
        .strip_prefix("~/")
        .or_else(|| path.strip_prefix("~\\"))
    {
        Some(rest) => home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(rest),
        None => PathBuf::from(path),
    }
}
