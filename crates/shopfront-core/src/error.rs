//! # Error Types
//!
//! Domain-specific error types for shopfront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shopfront-core errors (this file)                                     │
//! │  ├── CoreError        - Domain failures with stable error codes        │
//! │  └── ValidationError  - Missing or malformed input                     │
//! │                                                                         │
//! │  shopfront-store errors (separate crate)                               │
//! │  └── StoreError       - Lookups that found nothing, credential hashing │
//! │                                                                         │
//! │  shopfront-api errors (in app)                                         │
//! │  └── ApiError         - What callers see (serialized envelope)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → ApiError → Client    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failures Are Data
//! A `CoreError` is never a crash. Callers branch on [`CoreError::code`], which
//! is the exact string the storefront client switches on.

use thiserror::Error;

use crate::order_state::OrderState;

// =============================================================================
// Core Error
// =============================================================================

/// Domain failures raised by the order engine and the customer store.
///
/// Every variant maps to one stable code returned by [`CoreError::code`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// No line with the given id exists on the active order.
    #[error("Order line not found")]
    OrderLineNotFound { line_id: String },

    /// Coupon code is not in the coupon table.
    #[error("Invalid coupon code")]
    CouponCodeInvalid { code: String },

    /// Coupon code is already on the order.
    ///
    /// ## User Workflow
    /// ```text
    /// Apply "save10" ──► normalized "SAVE10" ──► applied ✓
    ///      │
    ///      ▼
    /// Apply "SAVE10" again
    ///      │
    ///      ▼
    /// CouponCodeAlreadyApplied { code: "SAVE10" }
    ///      │
    ///      ▼
    /// UI shows: "Coupon code already applied"
    /// ```
    #[error("Coupon code already applied")]
    CouponCodeAlreadyApplied { code: String },

    /// Shipping method id is not in the shipping method table.
    #[error("Invalid shipping method")]
    InvalidShippingMethod { method_id: String },

    /// Requested state is not reachable from the current state.
    ///
    /// `to` is the raw requested name, so unknown state names are reported
    /// exactly as the caller sent them.
    #[error("Cannot transition from {from} to {to}")]
    OrderStateTransition { from: OrderState, to: String },

    /// Payment was declined by the (simulated) gateway.
    #[error("Payment was declined")]
    PaymentDeclined,

    /// Payment failed in the (simulated) gateway.
    #[error("Payment failed")]
    PaymentFailed,

    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("An account with this email already exists")]
    EmailAddressConflict { email: String },

    /// Verification or reset token rejected by the account stub policy.
    #[error("Verification token is invalid")]
    VerificationTokenInvalid,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Machine-readable error code, as the storefront client expects it.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::OrderLineNotFound { .. } => "ORDER_LINE_NOT_FOUND",
            CoreError::CouponCodeInvalid { .. } => "COUPON_CODE_INVALID_ERROR",
            CoreError::CouponCodeAlreadyApplied { .. } => "COUPON_CODE_ALREADY_APPLIED_ERROR",
            CoreError::InvalidShippingMethod { .. } => "INVALID_SHIPPING_METHOD",
            CoreError::OrderStateTransition { .. } => "ORDER_STATE_TRANSITION_ERROR",
            CoreError::PaymentDeclined => "PAYMENT_DECLINED_ERROR",
            CoreError::PaymentFailed => "PAYMENT_FAILED_ERROR",
            CoreError::InvalidCredentials => "INVALID_CREDENTIALS_ERROR",
            CoreError::EmailAddressConflict { .. } => "EMAIL_ADDRESS_CONFLICT_ERROR",
            CoreError::VerificationTokenInvalid => "VERIFICATION_TOKEN_INVALID_ERROR",
            CoreError::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are raised before any store call, so no state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value is above the accepted maximum.
    ///
    /// ## When This Occurs
    /// - A line quantity or unit price above its bound
    /// - An order total that no longer fits in minor units
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: i64 },

    /// Invalid format (e.g., an email without '@').
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
