//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// FEC import configuration.
    #[serde(default)]
    pub import: ImportConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// FEC import configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    /// Currency assigned to imported lines when the file carries none.
    #[serde(default = "default_currency")]
    pub default_currency: String,
    /// Maximum number of row-level errors reported before the rest are
    /// counted but not detailed.
    #[serde(default = "default_max_reported_errors")]
    pub max_reported_errors: usize,
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_max_reported_errors() -> usize {
    200
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
            max_reported_errors: default_max_reported_errors(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("GRANDLIVRE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_config_defaults() {
        let import = ImportConfig::default();
        assert_eq!(import.default_currency, "EUR");
        assert_eq!(import.max_reported_errors, 200);
    }
}
