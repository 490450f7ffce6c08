//! # Client Configuration
//!
//! Where the API lives and the thresholds behind the dashboard.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MEDSTOCK_API_URL=https://pharmacy.example.com/api                  │
//! │     MEDSTOCK_TIMEOUT_SECS=30                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/medstock/client.toml (Linux)                             │
//! │     ~/Library/Application Support/com.medstock.billing/client.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:5000/api, 15s timeout                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "http://localhost:5000/api"
//! timeout_secs = 15
//!
//! [inventory]
//! low_stock_threshold = 10
//! expiry_window_days = 30
//! ```

use medstock_core::catalog::{DEFAULT_EXPIRY_WINDOW_DAYS, DEFAULT_LOW_STOCK_THRESHOLD};
use medstock_core::StockPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

/// Longest "expiring soon" window accepted from config (ten years).
pub const MAX_EXPIRY_WINDOW_DAYS: i64 = 3650;

// =============================================================================
// API Settings
// =============================================================================

/// How to reach the pharmacy REST API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL all endpoints hang off, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout() -> u64 {
    15
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Inventory Settings
// =============================================================================

/// Dashboard thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySettings {
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,

    #[serde(default = "default_expiry_window_days")]
    pub expiry_window_days: i64,
}

fn default_low_stock_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

fn default_expiry_window_days() -> i64 {
    DEFAULT_EXPIRY_WINDOW_DAYS
}

impl Default for InventorySettings {
    fn default() -> Self {
        InventorySettings {
            low_stock_threshold: default_low_stock_threshold(),
            expiry_window_days: default_expiry_window_days(),
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub inventory: InventorySettings,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = &self.api.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidConfig(format!(
                "API URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if !(0..=MAX_EXPIRY_WINDOW_DAYS).contains(&self.inventory.expiry_window_days) {
            return Err(ClientError::InvalidConfig(format!(
                "expiry_window_days must be between 0 and {}, got: {}",
                MAX_EXPIRY_WINDOW_DAYS, self.inventory.expiry_window_days
            )));
        }

        Ok(())
    }

    /// Applies overrides from `lookup` (the process environment in
    /// [`ClientConfig::load`]).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("MEDSTOCK_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(secs) = lookup("MEDSTOCK_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(s) => self.api.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid MEDSTOCK_TIMEOUT_SECS"),
            }
        }

        if let Some(threshold) = lookup("MEDSTOCK_LOW_STOCK_THRESHOLD") {
            match threshold.parse() {
                Ok(t) => self.inventory.low_stock_threshold = t,
                Err(_) => warn!(value = %threshold, "Ignoring invalid MEDSTOCK_LOW_STOCK_THRESHOLD"),
            }
        }

        if let Some(days) = lookup("MEDSTOCK_EXPIRY_WINDOW_DAYS") {
            match days.parse() {
                Ok(d) => self.inventory.expiry_window_days = d,
                Err(_) => warn!(value = %days, "Ignoring invalid MEDSTOCK_EXPIRY_WINDOW_DAYS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "medstock", "billing")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Dashboard thresholds as the core's policy type.
    pub fn stock_policy(&self) -> StockPolicy {
        StockPolicy {
            low_stock_threshold: self.inventory.low_stock_threshold,
            expiry_window_days: self.inventory.expiry_window_days,
        }
    }
}
