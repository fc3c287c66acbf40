//! # Validation Module
//!
//! Input validation for the command layer.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  └── Shape and types of the request record                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields present and non-blank                             │
//! │  └── Quantities, prices, emails well-formed                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store                                                        │
//! │  └── Domain failures (unknown line, coupon, state, ...)                │
//! │                                                                         │
//! │  A validation failure never reaches the store, so no state changes.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shopfront_core::validation::{validate_required, validate_quantity};
//!
//! assert_eq!(validate_required("variantId", " var-1-1 ").unwrap(), "var-1-1");
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted search term.
pub const MAX_SEARCH_TERM_LEN: usize = 100;

/// Longest accepted email address.
pub const MAX_EMAIL_LEN: usize = 254;

/// Largest quantity a single order line may hold.
pub const MAX_LINE_QUANTITY: i64 = 10_000;

/// Largest unit price accepted for a line, in minor units ($10,000,000.00).
pub const MAX_UNIT_PRICE: Money = Money::from_minor(1_000_000_000);

// =============================================================================
// String Validators
// =============================================================================

/// Requires a non-blank value and returns it trimmed.
pub fn validate_required<'a>(field: &str, value: &'a str) -> ValidationResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(value)
}

/// Requires an optional value to be present and non-blank.
pub fn require_present<'a>(field: &str, value: Option<&'a str>) -> ValidationResult<&'a str> {
    validate_required(field, value.unwrap_or_default())
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be blank
/// - At most 254 characters
/// - Exactly one '@' with something on both sides
///
/// ## Example
/// ```rust
/// use shopfront_core::validation::validate_email;
///
/// assert!(validate_email("demo@example.com").is_ok());
/// assert!(validate_email("demo.example.com").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    let email = validate_required("emailAddress", email)?;

    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong {
            field: "emailAddress".to_string(),
            max: MAX_EMAIL_LEN,
        });
    }

    let well_formed = matches!(
        email.split_once('@'),
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@')
    );
    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "emailAddress".to_string(),
            reason: "must look like name@domain".to_string(),
        });
    }

    Ok(email)
}

/// Validates a search term.
///
/// ## Rules
/// - Can be empty (matches every product)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed term.
pub fn validate_search_query(term: &str) -> ValidationResult<&str> {
    let term = term.trim();

    if term.chars().count() > MAX_SEARCH_TERM_LEN {
        return Err(ValidationError::TooLong {
            field: "term".to_string(),
            max: MAX_SEARCH_TERM_LEN,
        });
    }

    Ok(term)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the quantity of an add-to-cart request.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart: Add Item                                                         │
/// │                                                                         │
/// │  addItem { variantId: "var-1-1", quantity: 2 }                         │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(2) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       ├── qty > MAX_LINE_QUANTITY? → Error: "quantity must be at most" │
/// │       │                                                                 │
/// │       └── OK → Order::add_item                                         │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// `adjustLine` only applies the upper bound: a non-positive quantity there
/// removes the line.
pub fn validate_quantity(qty: i64) -> ValidationResult<i64> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    validate_quantity_bound(qty)
}

/// Rejects quantities above [`MAX_LINE_QUANTITY`].
pub fn validate_quantity_bound(qty: i64) -> ValidationResult<i64> {
    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::TooLarge {
            field: "quantity".to_string(),
            max: MAX_LINE_QUANTITY,
        });
    }
    Ok(qty)
}

/// Validates a caller-supplied unit price. Zero is allowed.
pub fn validate_price(price: Money) -> ValidationResult<Money> {
    if price.is_negative() {
        return Err(ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: "cannot be negative".to_string(),
        });
    }
    if price > MAX_UNIT_PRICE {
        return Err(ValidationError::TooLarge {
            field: "price".to_string(),
            max: MAX_UNIT_PRICE.minor(),
        });
    }
    Ok(price)
}

// =============================================================================
// Unit Tests
// =============================================================================
