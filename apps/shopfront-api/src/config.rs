//! # Configuration
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`SHOPFRONT_*`)
//! 2. Defaults (this file)
//!
//! Configuration is read-only after startup, so it is not behind a mutex.

use std::env;

use serde::{Deserialize, Serialize};
use shopfront_core::DEFAULT_CURRENCY_CODE;
use shopfront_store::{AccountStubPolicy, StoreConfig};

pub const ENV_CURRENCY: &str = "SHOPFRONT_CURRENCY";
pub const ENV_ACCOUNT_STUB: &str = "SHOPFRONT_ACCOUNT_STUB";
pub const ENV_SEED_DEMO_DATA: &str = "SHOPFRONT_SEED_DEMO_DATA";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Currency code (ISO 4217) stamped on new orders
    pub currency_code: String,

    /// How account verification and password reset answer
    pub account_stub: AccountStubPolicy,

    /// Load the demo catalog, customers and settings
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    /// ## Default Values
    /// - Currency: USD
    /// - Account stubs: accept
    /// - Demo data: seeded
    fn default() -> Self {
        AppConfig {
            currency_code: DEFAULT_CURRENCY_CODE.to_string(),
            account_stub: AccountStubPolicy::AcceptAll,
            seed_demo_data: true,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// ## Environment Variables
    /// - `SHOPFRONT_CURRENCY`: currency code (default `USD`)
    /// - `SHOPFRONT_ACCOUNT_STUB`: `accept` or `reject` (default `accept`)
    /// - `SHOPFRONT_SEED_DEMO_DATA`: `true` or `false` (default `true`)
    pub fn from_env() -> Result<Self, ConfigError> {
        AppConfig::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(currency) = lookup(ENV_CURRENCY) {
            let currency = currency.trim().to_ascii_uppercase();
            if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(ConfigError::InvalidValue(ENV_CURRENCY.to_string()));
            }
            config.currency_code = currency;
        }

        if let Some(policy) = lookup(ENV_ACCOUNT_STUB) {
            config.account_stub = policy
                .parse()
                .map_err(|_| ConfigError::InvalidValue(ENV_ACCOUNT_STUB.to_string()))?;
        }

        if let Some(seed) = lookup(ENV_SEED_DEMO_DATA) {
            config.seed_demo_data = parse_bool(&seed)
                .ok_or_else(|| ConfigError::InvalidValue(ENV_SEED_DEMO_DATA.to_string()))?;
        }

        Ok(config)
    }

    /// The store-level view of this configuration.
    pub fn to_store_config(&self) -> StoreConfig {
        StoreConfig::default()
            .currency_code(self.currency_code.clone())
            .account_stub(self.account_stub)
            .seed_demo_data(self.seed_demo_data)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

// =============================================================================
// Unit Tests
// =============================================================================
