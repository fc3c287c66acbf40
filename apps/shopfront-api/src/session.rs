//! # Session Tokens
//!
//! Turns whatever the caller sent as identity into a store key.
//!
//! ```text
//! raw value                    order operations     customer operations
//! ─────────                    ────────────────     ───────────────────
//! "Bearer 9f2c..."        ──►  "9f2c..."            Some("9f2c...")
//! "9f2c..."               ──►  "9f2c..."            Some("9f2c...")
//! missing / "" / "Bearer" ──►  "anonymous"          None
//! ```
//!
//! Carts work for guests; identity does not. A missing token never maps to
//! a customer.

use shopfront_core::ANONYMOUS_SESSION_TOKEN;

const BEARER_PREFIX: &str = "Bearer ";

/// Extracts the token from a raw token or an `Authorization: Bearer` value.
pub fn bearer_token(raw: Option<&str>) -> Option<&str> {
    let raw = raw?.trim();
    let token = raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw).trim();

    if token.is_empty() || token == BEARER_PREFIX.trim() {
        None
    } else {
        Some(token)
    }
}

/// Token keying the active order. Falls back to the anonymous session.
pub fn order_token(raw: Option<&str>) -> &str {
    bearer_token(raw).unwrap_or(ANONYMOUS_SESSION_TOKEN)
}

/// Token keying the customer session, if any.
pub fn customer_token(raw: Option<&str>) -> Option<&str> {
    bearer_token(raw)
}

// =============================================================================
// Unit Tests
// =============================================================================
