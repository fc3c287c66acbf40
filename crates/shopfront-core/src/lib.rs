//! # shopfront-core: Pure Business Logic for Shopfront
//!
//! This crate is the **heart** of the storefront data-access layer. It holds
//! the domain records and the rules that mutate them, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shopfront Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Storefront Client (composables)                 │   │
//! │  │    Browse ──► Cart ──► Coupon ──► Shipping ──► Payment          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON request records                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    shopfront-api (commands)                     │   │
//! │  │    add_item_to_order, apply_coupon_code, login, search, ...    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    shopfront-store (Store)                      │   │
//! │  │     Catalog • Customers/Sessions • Orders • Settings            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ shopfront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌─────────────┐ ┌──────────────┐   │   │
//! │  │   │  types   │ │  order   │ │ order_state │ │   pricing    │   │   │
//! │  │   │ Product  │ │  Order   │ │ AddingItems │ │ coupons      │   │   │
//! │  │   │ Customer │ │ OrderLine│ │ ... ──►     │ │ flat rates   │   │   │
//! │  │   └──────────┘ └──────────┘ └─────────────┘ └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO SHARED STATE • PURE FUNCTIONS                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog, customer and shop-configuration records
//! - [`order`] - The `Order` aggregate: lines, coupons, shipping, payments, totals
//! - [`order_state`] - The order lifecycle state machine
//! - [`pricing`] - Coupon and flat-rate shipping tables
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Totals are derived**: every mutation ends in a full recalculation
//! 2. **No I/O**: maps, sessions and clocks other than `Utc::now` live elsewhere
//! 3. **Integer Money**: all monetary values are minor units (i64)
//! 4. **Failures are data**: every domain failure has a stable error code
//!
//! ## Example Usage
//!
//! ```rust
//! use shopfront_core::money::Money;
//! use shopfront_core::order::{Order, VariantInfo};
//!
//! let mut order = Order::new("ORD-DEMO0001", "USD");
//! let info = VariantInfo::new("iPhone 15 Pro 128GB", "IP15P-128-NT", Money::from_minor(99900));
//!
//! order.add_item("var-1-1", 1, &info).unwrap();
//! order.add_item("var-1-1", 2, &info).unwrap();
//!
//! assert_eq!(order.lines[0].quantity, 3);
//! assert_eq!(order.sub_total.minor(), 299700);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod order;
pub mod order_state;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use shopfront_core::Money` instead of
// `use shopfront_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{
    AddPaymentInput, Discount, Order, OrderAddress, OrderCustomer, OrderLine, OrderPayment,
    PaymentMetadata, SetCustomerInput, ShippingAddressInput, ShippingLine, ShippingLineMethod,
    Totals, VariantInfo, VariantRef,
};
pub use order_state::OrderState;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency stamped on new orders when nothing else is configured.
pub const DEFAULT_CURRENCY_CODE: &str = "USD";

/// Session token used for order operations when the caller sent none.
///
/// Carts work for guests; identity does not. Customer operations treat a
/// missing token as "no session" instead of mapping it here.
pub const ANONYMOUS_SESSION_TOKEN: &str = "anonymous";

/// Default page size for catalog listing and search.
pub const DEFAULT_CATALOG_TAKE: usize = 12;

/// Default page size for order history.
pub const DEFAULT_HISTORY_TAKE: usize = 10;
