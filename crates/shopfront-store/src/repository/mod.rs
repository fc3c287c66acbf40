//! # Repository Module
//!
//! In-memory repositories behind the [`Store`](crate::Store).
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Command                                                                │
//! │       │                                                                 │
//! │       │  store.orders_mut().apply_coupon(token, "SAVE10")               │
//! │       ▼                                                                 │
//! │  OrderRepository                                                        │
//! │  ├── resolves the token's active order                                  │
//! │  ├── delegates the rule to shopfront-core (Order::apply_coupon)         │
//! │  └── logs and returns a snapshot of the order                           │
//! │                                                                         │
//! │  Catalog and ShopSettings are read-only and shared behind Arc.          │
//! │  CustomerRepository and OrderRepository own their maps outright.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`Catalog`](catalog::Catalog) - Product and collection lookup, search
//! - [`CustomerRepository`](customer::CustomerRepository) - Accounts and sessions
//! - [`OrderRepository`](order::OrderRepository) - Orders and active-order bookkeeping
//! - [`ShopSettings`](settings::ShopSettings) - Shipping, payment and country tables

pub mod catalog;
pub mod customer;
pub mod order;
pub mod settings;
