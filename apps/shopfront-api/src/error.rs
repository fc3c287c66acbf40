//! # API Error Type
//!
//! Unified error type for commands, and the response envelope it travels in.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Shopfront                              │
//! │                                                                         │
//! │  Client                      Rust Backend                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  {"op": "applyCouponCode", "couponCode": "save10"}                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Missing field? ──── ValidationError::Required ─────┐           │  │
//! │  │         │                                           │           │  │
//! │  │         ▼                                           ▼           │  │
//! │  │  Domain failure? ─── CoreError::CouponCodeInvalid ─ ApiError ──►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄────────────────────────────────────────────────────────────────────  │
//! │                                                                         │
//! │  {"success": false,                                                     │
//! │   "errorCode": "COUPON_CODE_INVALID_ERROR",                             │
//! │   "message": "Invalid coupon code"}                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failures are data. A command never panics on bad input and the envelope
//! is either a success or a failure, never both.

use serde::Serialize;
use serde_json::{Map, Value};
use shopfront_core::{CoreError, ValidationError};
use shopfront_store::StoreError;

/// Fixed text carried in the `transitionError` field of a rejected transition.
pub const TRANSITION_ERROR_TEXT: &str = "Invalid state transition";

/// API error returned from commands.
///
/// ## Serialization
/// This is what the client receives inside a failure envelope:
/// ```json
/// {
///   "errorCode": "ORDER_STATE_TRANSITION_ERROR",
///   "message": "Cannot transition from AddingItems to Shipped",
///   "transitionError": "Invalid state transition",
///   "fromState": "AddingItems",
///   "toState": "Shipped"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    #[serde(rename = "errorCode")]
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Code-specific fields, flattened next to `errorCode` and `message`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Error codes for API responses.
///
/// The domain codes are the exact strings the storefront client switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing or malformed input (no state touched)
    ValidationError,

    /// Product, collection, variant or order not found
    NotFound,

    OrderLineNotFound,
    CouponCodeInvalidError,
    CouponCodeAlreadyAppliedError,
    InvalidShippingMethod,
    OrderStateTransitionError,
    PaymentDeclinedError,
    PaymentFailedError,
    InvalidCredentialsError,
    EmailAddressConflictError,
    VerificationTokenInvalidError,

    /// Internal failure (details only in the log)
    Internal,
}

impl From<&CoreError> for ErrorCode {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::OrderLineNotFound { .. } => ErrorCode::OrderLineNotFound,
            CoreError::CouponCodeInvalid { .. } => ErrorCode::CouponCodeInvalidError,
            CoreError::CouponCodeAlreadyApplied { .. } => ErrorCode::CouponCodeAlreadyAppliedError,
            CoreError::InvalidShippingMethod { .. } => ErrorCode::InvalidShippingMethod,
            CoreError::OrderStateTransition { .. } => ErrorCode::OrderStateTransitionError,
            CoreError::PaymentDeclined => ErrorCode::PaymentDeclinedError,
            CoreError::PaymentFailed => ErrorCode::PaymentFailedError,
            CoreError::InvalidCredentials => ErrorCode::InvalidCredentialsError,
            CoreError::EmailAddressConflict { .. } => ErrorCode::EmailAddressConflictError,
            CoreError::VerificationTokenInvalid => ErrorCode::VerificationTokenInvalidError,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            extra: Map::new(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Adds a code-specific field.
    pub fn with_extra(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

/// Converts validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = ErrorCode::from(&err);

        match err {
            CoreError::Validation(e) => ApiError::from(e),
            CoreError::OrderStateTransition { ref from, ref to } => {
                let (from, to) = (from.to_string(), to.clone());
                ApiError::new(code, err.to_string())
                    .with_extra("transitionError", TRANSITION_ERROR_TEXT)
                    .with_extra("fromState", from)
                    .with_extra("toState", to)
            }
            other => ApiError::new(code, other.to_string()),
        }
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            StoreError::Core(e) => ApiError::from(e),
            StoreError::Credential(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Credential operation failed: {}", e);
                ApiError::internal("Internal error")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Envelope
// =============================================================================

/// Response envelope: a success wrapping the data, or a failure.
///
/// ```json
/// {"success": true, "data": {...}}
/// {"success": false, "errorCode": "...", "message": "..."}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Success {
        success: bool,
        data: T,
    },
    Failure {
        success: bool,
        #[serde(flatten)]
        error: ApiError,
    },
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Envelope::Success {
            success: true,
            data,
        }
    }

    pub fn failure(error: ApiError) -> Self {
        Envelope::Failure {
            success: false,
            error,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }
}

impl<T> From<Result<T, ApiError>> for Envelope<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => Envelope::success(data),
            Err(error) => Envelope::failure(error),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
