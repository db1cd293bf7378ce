//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Leave policy toggles.
    #[serde(default)]
    pub leave: LeaveConfig,
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

/// What to do when a new leave request overlaps an active one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicySetting {
    /// Detect and log the overlap, but accept the request.
    #[default]
    Allow,
    /// Refuse the request.
    Reject,
}

/// Leave policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveConfig {
    /// Overlap handling on request creation.
    #[serde(default)]
    pub overlap_policy: OverlapPolicySetting,
    /// Enforce the leave type's minimum notice on request creation.
    #[serde(default)]
    pub enforce_min_notice: bool,
    /// Accept requests that push the derived remaining balance below zero.
    #[serde(default = "default_allow_negative_balance")]
    pub allow_negative_balance: bool,
}

fn default_allow_negative_balance() -> bool {
    true
}

impl Default for LeaveConfig {
    fn default() -> Self {
        Self {
            overlap_policy: OverlapPolicySetting::default(),
            enforce_min_notice: false,
            allow_negative_balance: default_allow_negative_balance(),
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
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LEAVEWISE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
