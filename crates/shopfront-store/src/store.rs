//! # Store
//!
//! The single object that owns every map of the storefront.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  App Startup                                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreConfig::default().currency_code("EUR") ← Configure               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::open(config) ← Seed demo data if enabled                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │                Store                     │                           │
//! │  │  catalog   : Arc<Catalog>       (read)   │                           │
//! │  │  settings  : Arc<ShopSettings>  (read)   │                           │
//! │  │  customers : CustomerRepository (write)  │                           │
//! │  │  orders    : OrderRepository    (write)  │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │ wrapped in Arc<Mutex<Store>> by the api app                     │
//! │       ▼                                                                 │
//! │  One command at a time                                                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store has no interior locking. `&mut self` accessors are the only way
//! to mutate it; tests build as many isolated stores as they like.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shopfront_core::DEFAULT_CURRENCY_CODE;
use tracing::info;

use crate::error::StoreResult;
use crate::repository::catalog::Catalog;
use crate::repository::customer::CustomerRepository;
use crate::repository::order::OrderRepository;
use crate::repository::settings::ShopSettings;
use crate::seed;

// =============================================================================
// Configuration
// =============================================================================

/// How the account verification and password reset stubs answer.
///
/// Neither policy checks any token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStubPolicy {
    /// Verify and reset always succeed.
    #[default]
    AcceptAll,
    /// Verify and reset always fail with `VERIFICATION_TOKEN_INVALID_ERROR`.
    RejectAll,
}

impl fmt::Display for AccountStubPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountStubPolicy::AcceptAll => write!(f, "accept"),
            AccountStubPolicy::RejectAll => write!(f, "reject"),
        }
    }
}

impl FromStr for AccountStubPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accept" | "accept_all" => Ok(AccountStubPolicy::AcceptAll),
            "reject" | "reject_all" => Ok(AccountStubPolicy::RejectAll),
            other => Err(format!("unknown account stub policy: {other}")),
        }
    }
}

/// Store configuration.
///
/// ## Example
/// ```rust
/// use shopfront_store::{AccountStubPolicy, StoreConfig};
///
/// let config = StoreConfig::default()
///     .currency_code("EUR")
///     .account_stub(AccountStubPolicy::RejectAll)
///     .seed_demo_data(false);
/// assert_eq!(config.currency_code, "EUR");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Currency stamped on new orders.
    /// Default: USD
    pub currency_code: String,

    /// Behavior of the verify/reset stubs.
    /// Default: AcceptAll
    pub account_stub: AccountStubPolicy,

    /// Whether [`Store::open`] loads the demo catalog, customers and settings.
    /// Default: true
    pub seed_demo_data: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            currency_code: DEFAULT_CURRENCY_CODE.to_string(),
            account_stub: AccountStubPolicy::AcceptAll,
            seed_demo_data: true,
        }
    }
}

impl StoreConfig {
    /// Sets the currency code.
    pub fn currency_code(mut self, code: impl Into<String>) -> Self {
        self.currency_code = code.into();
        self
    }

    /// Sets the account stub policy.
    pub fn account_stub(mut self, policy: AccountStubPolicy) -> Self {
        self.account_stub = policy;
        self
    }

    /// Sets whether demo data is seeded.
    pub fn seed_demo_data(mut self, seed: bool) -> Self {
        self.seed_demo_data = seed;
        self
    }
}

// =============================================================================
// Store
// =============================================================================

/// Owner of the catalog, settings, customer and order maps.
///
/// ## Usage
/// ```rust
/// use shopfront_store::{Store, StoreConfig};
///
/// let mut store = Store::seeded(StoreConfig::default()).unwrap();
///
/// let hits = store.catalog().search("lamp", None, 0, 12);
/// assert_eq!(hits.total_items, 1);
///
/// let login = store.customers_mut().login("demo@example.com", "password123");
/// assert!(login.is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    config: StoreConfig,
    catalog: Arc<Catalog>,
    settings: Arc<ShopSettings>,
    customers: CustomerRepository,
    orders: OrderRepository,
}

impl Store {
    /// Creates a store with an empty catalog, no customers and no settings.
    pub fn new(config: StoreConfig) -> Self {
        Store::from_parts(config, Catalog::default(), ShopSettings::default())
    }

    /// Creates a store with the demo catalog, settings and customers.
    ///
    /// Fails only if a demo password cannot be hashed.
    pub fn seeded(config: StoreConfig) -> StoreResult<Self> {
        let mut store = Store::from_parts(config, seed::demo_catalog(), seed::demo_settings());
        seed::seed_customers(&mut store.customers)?;

        info!(
            products = store.catalog.len(),
            "Store seeded with demo data"
        );
        Ok(store)
    }

    /// Creates a store, seeded or empty according to `config.seed_demo_data`.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        if config.seed_demo_data {
            Store::seeded(config)
        } else {
            info!("Opening empty store");
            Ok(Store::new(config))
        }
    }

    /// Creates a store from an explicit catalog and settings, without customers.
    pub fn from_parts(config: StoreConfig, catalog: Catalog, settings: ShopSettings) -> Self {
        let settings = Arc::new(settings);

        Store {
            catalog: Arc::new(catalog),
            customers: CustomerRepository::new(config.account_stub),
            orders: OrderRepository::new(config.currency_code.clone(), Arc::clone(&settings)),
            settings,
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the shop settings.
    pub fn settings(&self) -> &ShopSettings {
        &self.settings
    }

    pub fn customers(&self) -> &CustomerRepository {
        &self.customers
    }

    pub fn customers_mut(&mut self) -> &mut CustomerRepository {
        &mut self.customers
    }

    pub fn orders(&self) -> &OrderRepository {
        &self.orders
    }

    pub fn orders_mut(&mut self) -> &mut OrderRepository {
        &mut self.orders
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
