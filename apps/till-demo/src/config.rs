//! # Demo Configuration
//!
//! Loads the [`CheckoutConfig`] the demo prices orders with.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TILL_STORE_NAME="Corner Shop"                                      │
//! │     TILL_ORDER_PREFIX=WEB                                              │
//! │     TILL_MIN_SHIPPING=7.50                                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, else ~/.config/till/till.toml (Linux)             │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     CheckoutConfig::default()                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use till_core::{CheckoutConfig, Money};
use tracing::{debug, info, warn};

use crate::error::{DemoError, DemoResult};

pub const ENV_STORE_NAME: &str = "TILL_STORE_NAME";
pub const ENV_ORDER_PREFIX: &str = "TILL_ORDER_PREFIX";
pub const ENV_MIN_SHIPPING: &str = "TILL_MIN_SHIPPING";

/// Loads configuration from file + environment, then validates it.
///
/// A missing file is not an error; defaults are used instead.
pub fn load(config_path: Option<PathBuf>) -> DemoResult<CheckoutConfig> {
    let mut config = CheckoutConfig::default();

    if let Some(path) = config_path.or_else(default_config_path) {
        if path.exists() {
            info!(?path, "Loading checkout config from file");
            let contents = std::fs::read_to_string(&path)?;
            config = toml::from_str(&contents)?;
        } else {
            debug!(?path, "Config file not found, using defaults");
        }
    }

    apply_overrides(&mut config, |var| std::env::var(var).ok())?;

    config.validate()?;

    Ok(config)
}

/// Loads configuration or falls back to defaults on any error.
pub fn load_or_default(config_path: Option<PathBuf>) -> CheckoutConfig {
    load(config_path).unwrap_or_else(|e| {
        warn!("Failed to load checkout config: {}. Using defaults.", e);
        CheckoutConfig::default()
    })
}

/// Applies `TILL_*` overrides, reading variables through `lookup`.
pub fn apply_overrides<F>(config: &mut CheckoutConfig, lookup: F) -> DemoResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(name) = lookup(ENV_STORE_NAME) {
        debug!(store_name = %name, "Overriding store name from environment");
        config.store_name = name;
    }

    if let Some(prefix) = lookup(ENV_ORDER_PREFIX) {
        debug!(prefix = %prefix, "Overriding order prefix from environment");
        config.order_prefix = prefix;
    }

    if let Some(raw) = lookup(ENV_MIN_SHIPPING) {
        let amount = Decimal::from_str(raw.trim()).map_err(|_| DemoError::InvalidEnv {
            var: ENV_MIN_SHIPPING,
            value: raw.clone(),
        })?;
        debug!(minimum = %amount, "Overriding minimum shipping charge from environment");
        config.shipping.minimum_charge = Money::new(amount);
    }

    Ok(())
}

/// Returns the default config file path.
fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "till", "till")
        .map(|dirs| dirs.config_dir().join("till.toml"))
}
