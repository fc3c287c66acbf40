//! # shopfront-store: In-Memory Data Layer for Shopfront
//!
//! This crate owns every piece of mutable storefront state. It keeps the
//! catalog, customers, sessions and orders in plain in-process maps and
//! delegates every business rule to `shopfront-core`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shopfront Data Flow                              │
//! │                                                                         │
//! │  Command (apply_coupon_code)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   shopfront-store (THIS CRATE)                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────────┐   ┌────────────┐  │   │
//! │  │   │    Store      │    │   Repositories    │   │   Seed     │  │   │
//! │  │   │  (store.rs)   │    │                   │   │ (seed.rs)  │  │   │
//! │  │   │               │    │ Catalog           │   │            │  │   │
//! │  │   │ StoreConfig   │◄───│ CustomerRepository│   │ 6 products │  │   │
//! │  │   │ open/seeded   │    │ OrderRepository   │   │ 2 accounts │  │   │
//! │  │   │               │    │ ShopSettings      │   │ 10 countries│ │   │
//! │  │   └───────────────┘    └───────────────────┘   └────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  shopfront-core (rules, types)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is persisted. Dropping the [`Store`] drops every order and session.
//!
//! ## Module Organization
//!
//! - [`store`] - The [`Store`] and its [`StoreConfig`]
//! - [`repository`] - Catalog, customer, order and settings repositories
//! - [`seed`] - Demo catalog, accounts and shop settings
//! - [`credential`] - Password hashing
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust
//! use shopfront_store::{Store, StoreConfig};
//! use shopfront_core::VariantInfo;
//!
//! let mut store = Store::open(StoreConfig::default()).unwrap();
//!
//! let info = store.catalog().variant_info("var-6-1").unwrap();
//! let order = store
//!     .orders_mut()
//!     .add_item("anonymous", "var-6-1", 2, &info)
//!     .unwrap();
//!
//! assert_eq!(order.total_quantity, 2);
//! assert_eq!(order.sub_total.minor(), 9800);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod credential;
pub mod error;
pub mod repository;
pub mod seed;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use store::{AccountStubPolicy, Store, StoreConfig};

// Repository re-exports for convenience
pub use repository::catalog::Catalog;
pub use repository::customer::{CustomerRepository, DEFAULT_PASSWORD};
pub use repository::order::OrderRepository;
pub use repository::settings::ShopSettings;
