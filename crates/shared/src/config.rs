//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Financial computation defaults.
    #[serde(default)]
    pub finance: FinanceConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
///
/// Without a `url` the server runs against the in-memory store.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: Option<String>,
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

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

/// Defaults used by the financial engine.
#[derive(Debug, Clone, Deserialize)]
pub struct FinanceConfig {
    /// Working days assumed for a month with no configuration row.
    #[serde(default = "default_working_days")]
    pub default_working_days: u32,
    /// Potential hours assumed for a month with no configuration row.
    #[serde(default = "default_potential_hours")]
    pub default_potential_hours: u32,
    /// Workpackages ending within this many days raise a deadline alert.
    #[serde(default = "default_deadline_alert_days")]
    pub deadline_alert_days: i64,
}

fn default_working_days() -> u32 {
    20
}

fn default_potential_hours() -> u32 {
    160
}

fn default_deadline_alert_days() -> i64 {
    30
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            default_working_days: default_working_days(),
            default_potential_hours: default_potential_hours(),
            deadline_alert_days: default_deadline_alert_days(),
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
            .add_source(config::Environment::with_prefix("TESSERA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_any_source() {
        temp_env::with_vars_unset(
            ["TESSERA__SERVER__PORT", "TESSERA__DATABASE__URL", "RUN_MODE"],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.port, 8080);
                assert!(config.database.url.is_none());
                assert_eq!(config.finance.default_working_days, 20);
                assert_eq!(config.finance.default_potential_hours, 160);
                assert_eq!(config.finance.deadline_alert_days, 30);
            },
        );
    }

    #[test]
    fn test_environment_overrides() {
        temp_env::with_vars(
            [
                ("TESSERA__SERVER__PORT", Some("9090")),
                ("TESSERA__DATABASE__URL", Some("postgres://localhost/tessera")),
                ("TESSERA__FINANCE__DEFAULT_POTENTIAL_HOURS", Some("168")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.port, 9090);
                assert_eq!(
                    config.database.url.as_deref(),
                    Some("postgres://localhost/tessera")
                );
                assert_eq!(config.finance.default_potential_hours, 168);
            },
        );
    }
}
