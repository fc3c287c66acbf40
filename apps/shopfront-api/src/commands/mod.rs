//! # Commands Module
//!
//! One function per store operation.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (shared inputs)
//! ├── catalog.rs   ◄─── Search, products, collections, stock
//! ├── customer.rs  ◄─── Login, logout, register, account stubs
//! ├── order.rs     ◄─── Active order, lines, coupons, checkout
//! └── settings.rs  ◄─── Shipping, payment, countries, channel
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  pub fn apply_coupon_code(                                              │
//! │      state: &AppState,           ◄── Shared store                       │
//! │      session: Option<&str>,      ◄── Raw token / Bearer value           │
//! │      input: CouponInput,         ◄── Flat input record                  │
//! │  ) -> Result<Order, ApiError>                                           │
//! │         │                                                               │
//! │         ├── 1. validate required fields (no state touched on failure)   │
//! │         ├── 2. resolve the session token                                │
//! │         ├── 3. one store call under the lock                            │
//! │         └── 4. return the plain record                                  │
//! │                                                                         │
//! │  The dispatcher wraps the Result into an Envelope.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod customer;
pub mod order;
pub mod settings;

use serde::{Deserialize, Serialize};

/// Pagination window. Missing values fall back to the command's default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInput {
    #[serde(default)]
    pub skip: Option<usize>,
    #[serde(default)]
    pub take: Option<usize>,
}

impl PageInput {
    pub fn new(skip: usize, take: usize) -> Self {
        PageInput {
            skip: Some(skip),
            take: Some(take),
        }
    }

    /// Resolves `(skip, take)`.
    pub(crate) fn window(&self, default_take: usize) -> (usize, usize) {
        (self.skip.unwrap_or(0), self.take.unwrap_or(default_take))
    }
}

/// Result of operations that only report success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuccessResult {
    pub success: bool,
}

impl SuccessResult {
    pub fn ok() -> Self {
        SuccessResult { success: true }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
