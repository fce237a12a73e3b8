//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Document store configuration.
    #[serde(default)]
    pub store: StoreConfig,
}

/// Document store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Maximum attempts for an optimistic transaction before giving up.
    #[serde(default = "default_max_transaction_attempts")]
    pub max_transaction_attempts: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_transaction_attempts: default_max_transaction_attempts(),
        }
    }
}

fn default_max_transaction_attempts() -> u32 {
    5
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FABRIKA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.max_transaction_attempts, 5);
    }
}
