//! # Demo Settings
//!
//! Environment-driven settings for the demo binary and the lookup of the
//! checkout configuration file.

use anyhow::Context;
use flex_core::CheckoutConfig;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Where the checkout config is searched for when `FLEXORDER_CONFIG` is unset
const CONFIG_PATHS: [&str; 3] = [
    "config/checkout.toml",
    "../config/checkout.toml",
    "../../config/checkout.toml",
];

/// Demo settings
#[derive(Debug, Clone, Default)]
pub struct DemoSettings {
    /// Explicit config file (`FLEXORDER_CONFIG`)
    pub config_path: Option<PathBuf>,
    /// Emit JSON logs (`LOG_FORMAT=json`)
    pub log_json: bool,
}

impl DemoSettings {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            config_path: std::env::var_os("FLEXORDER_CONFIG").map(PathBuf::from),
            log_json: std::env::var("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }

    /// Load the checkout configuration.
    ///
    /// An explicit path must exist. Without one the usual locations are tried
    /// and the built-in defaults are used if none is found.
    pub fn load_checkout_config(&self) -> anyhow::Result<CheckoutConfig> {
        if let Some(path) = &self.config_path {
            return load_from(path);
        }

        for path in CONFIG_PATHS {
            let path = Path::new(path);
            if path.exists() {
                return load_from(path);
            }
        }

        warn!("No checkout config found, using built-in defaults");
        Ok(CheckoutConfig::default())
    }
}

fn load_from(path: &Path) -> anyhow::Result<CheckoutConfig> {
    let config = CheckoutConfig::from_file(path)
        .with_context(|| format!("Failed to load checkout config from {}", path.display()))?;
    info!(
        "Loaded checkout config from {} ({} price adjustments)",
        path.display(),
        config.pricing.adjustments.len()
    );
    Ok(config)
}
