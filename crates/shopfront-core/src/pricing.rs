//! # Pricing Tables
//!
//! The fixed coupon and flat-rate shipping tables of the demo shop.
//!
//! ## Where Each Table Applies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  applyCoupon("save10")                                                  │
//! │      │ normalize_coupon_code ──► "SAVE10"                               │
//! │      ▼                                                                  │
//! │  coupon_discount("SAVE10") ──► Some($10.00) ──► Discount on the order   │
//! │                                                                         │
//! │  setShippingAddress({ countryCode: "CA" })                              │
//! │      ▼                                                                  │
//! │  shipping_rate_for_country("CA") ──► $14.99 ──► shippingWithTax         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Shipping *methods* (ship-1, ship-2, ...) are configuration, not pricing
//! rules, and live in the settings store.

use crate::money::Money;

// =============================================================================
// Coupons
// =============================================================================

/// Accepted coupon codes and their flat discount, in minor units.
pub const COUPONS: [(&str, i64); 3] = [("SAVE10", 1000), ("SAVE20", 2000), ("WELCOME", 500)];

/// Prefix of the description stamped on a coupon discount.
pub const COUPON_DESCRIPTION_PREFIX: &str = "Coupon: ";

/// Normalizes a coupon code for comparison (trimmed, upper-cased).
pub fn normalize_coupon_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Looks up the discount for an already-normalized coupon code.
///
/// ## Example
/// ```rust
/// use shopfront_core::pricing::{coupon_discount, normalize_coupon_code};
///
/// let code = normalize_coupon_code("welcome");
/// assert_eq!(coupon_discount(&code).map(|m| m.minor()), Some(500));
/// assert!(coupon_discount("FREESTUFF").is_none());
/// ```
pub fn coupon_discount(normalized_code: &str) -> Option<Money> {
    COUPONS
        .iter()
        .find(|(code, _)| *code == normalized_code)
        .map(|(_, minor)| Money::from_minor(*minor))
}

// =============================================================================
// Flat-Rate Shipping
// =============================================================================

/// Flat shipping rate for countries not in [`COUNTRY_SHIPPING_RATES`].
pub const DEFAULT_SHIPPING_RATE: Money = Money::from_minor(2499);

/// Country-specific flat shipping rates, in minor units.
pub const COUNTRY_SHIPPING_RATES: [(&str, i64); 3] = [("US", 999), ("CA", 1499), ("GB", 1999)];

/// Flat shipping rate for a destination country code.
///
/// Matching is exact on the ISO code; anything unknown (including lowercase
/// codes) gets [`DEFAULT_SHIPPING_RATE`].
pub fn shipping_rate_for_country(country_code: &str) -> Money {
    COUNTRY_SHIPPING_RATES
        .iter()
        .find(|(code, _)| *code == country_code)
        .map(|(_, minor)| Money::from_minor(*minor))
        .unwrap_or(DEFAULT_SHIPPING_RATE)
}

// =============================================================================
// Unit Tests
// =============================================================================
