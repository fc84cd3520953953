use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, WayfarerError};
use crate::types::FallbackPolicy;

/// Top-level configuration for the Wayfarer application.
///
/// Loaded from `~/.wayfarer/config.toml` by default. Every section falls
/// back to its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WayfarerConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub advisory: AdvisoryConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

impl WayfarerConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: WayfarerConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(WayfarerError::Config("server.port must be non-zero".into()));
        }
        if self.server.rate_limit_window_secs == 0 {
            return Err(WayfarerError::Config(
                "server.rate_limit_window_secs must be non-zero".into(),
            ));
        }
        if self.history.max_limit == 0 {
            return Err(WayfarerError::Config(
                "history.max_limit must be non-zero".into(),
            ));
        }
        if self.history.default_limit > self.history.max_limit {
            return Err(WayfarerError::Config(format!(
                "history.default_limit ({}) exceeds history.max_limit ({})",
                self.history.default_limit, self.history.max_limit
            )));
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory holding the history database.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.wayfarer/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
    /// Requests a single client may make per window.
    pub rate_limit_requests: u32,
    /// Length of the rate limit window in seconds.
    pub rate_limit_window_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            allowed_origins: vec!["http://localhost:3000".to_string()],
            rate_limit_requests: 50,
            rate_limit_window_secs: 60,
        }
    }
}

/// Query interpretation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    /// Destination used when no route pattern matches.
    pub fallback: FallbackPolicy,
}

/// History listing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Entries returned when the caller gives no limit.
    pub default_limit: u64,
    /// Upper bound on any requested limit.
    pub max_limit: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = WayfarerConfig::default();
        assert_eq!(config.general.data_dir, "~/.wayfarer/data");
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.server.rate_limit_requests, 50);
        assert_eq!(config.server.rate_limit_window_secs, 60);
        assert_eq!(config.advisory.fallback, FallbackPolicy::RawQuery);
        assert_eq!(config.history.default_limit, 10);
        assert_eq!(config.history.max_limit, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
data_dir = "/srv/wayfarer"
log_level = "debug"

[server]
host = "0.0.0.0"
port = 9090
allowed_origins = ["https://travel.example.com", "http://localhost:5173"]
rate_limit_requests = 20
rate_limit_window_secs = 3600

[advisory]
fallback = "placeholder"

[history]
default_limit = 25
max_limit = 250
"#;
        let file = create_temp_config(content);
        let config = WayfarerConfig::load(file.path()).unwrap();
        assert_eq!(config.general.data_dir, "/srv/wayfarer");
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.allowed_origins.len(), 2);
        assert_eq!(config.server.rate_limit_requests, 20);
        assert_eq!(config.server.rate_limit_window_secs, 3600);
        assert_eq!(config.advisory.fallback, FallbackPolicy::Placeholder);
        assert_eq!(config.history.default_limit, 25);
        assert_eq!(config.history.max_limit, 250);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[server]
port = 8080
"#;
        let file = create_temp_config(content);
        let config = WayfarerConfig::load(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        // Remaining fields use defaults
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.advisory.fallback, FallbackPolicy::RawQuery);
    }

    #[test]
    fn test_config_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = WayfarerConfig::load(file.path()).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.history.default_limit, 10);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = WayfarerConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.data_dir, "~/.wayfarer/data");
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("this is {{ not valid TOML");
        let result = WayfarerConfig::load(file.path());
        assert!(matches!(result, Err(WayfarerError::Config(_))));
    }

    #[test]
    fn test_load_unknown_fallback_policy_fails() {
        let file = create_temp_config("[advisory]\nfallback = \"guess\"\n");
        assert!(WayfarerConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let file = create_temp_config("[server]\nport = 0\n");
        assert!(matches!(
            WayfarerConfig::load(file.path()),
            Err(WayfarerError::Config(_))
        ));

        let file = create_temp_config("[history]\ndefault_limit = 500\nmax_limit = 100\n");
        let err = WayfarerConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("default_limit"));
    }

    #[test]
    fn test_validate_zero_window() {
        let mut config = WayfarerConfig::default();
        config.server.rate_limit_window_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let mut config = WayfarerConfig::default();
        config.advisory.fallback = FallbackPolicy::Placeholder;
        config.server.port = 8123;
        config.save(&path).unwrap();

        assert!(path.exists());
        let reloaded = WayfarerConfig::load(&path).unwrap();
        assert_eq!(reloaded.server.port, 8123);
        assert_eq!(reloaded.advisory.fallback, FallbackPolicy::Placeholder);
        assert_eq!(reloaded.general.data_dir, config.general.data_dir);
    }
}
