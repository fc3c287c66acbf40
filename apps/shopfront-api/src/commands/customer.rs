//! # Customer Commands
//!
//! Login sessions, registration and the account stubs.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  login { emailAddress, password }                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  { token: "9f2c...", currentUser } ◄── client keeps the token          │
//! │       │                                                                 │
//! │       │  later requests carry "Bearer 9f2c..."                          │
//! │       ▼                                                                 │
//! │  getActiveCustomer / getAddresses                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  logout ──► token forgotten (idempotent)                                │
//! │                                                                         │
//! │  No token at all means "no customer", never the anonymous cart token.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Deserialize;
use shopfront_core::validation::{require_present, validate_email};
use shopfront_core::{Address, CurrentUser, Customer, LoginResult, RegisterCustomerInput};
use tracing::debug;

use crate::commands::SuccessResult;
use crate::error::ApiError;
use crate::session::customer_token;
use crate::state::AppState;

/// Input for `login`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Accepted for client compatibility. Sessions never expire.
    #[serde(default)]
    pub remember_me: Option<bool>,
}

/// Input for `registerCustomerAccount`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Input for `verifyCustomerAccount` and `resetPassword`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTokenInput {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Input for `requestPasswordReset`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequestInput {
    #[serde(default)]
    pub email_address: Option<String>,
}

/// Logs a customer in.
///
/// ## Errors
/// - `VALIDATION_ERROR` if email or password is missing
/// - `INVALID_CREDENTIALS_ERROR` for an unknown email or a wrong password
pub fn login(state: &AppState, input: LoginInput) -> Result<LoginResult, ApiError> {
    let email = require_present("emailAddress", input.email_address.as_deref())?;
    let password = input
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::validation("password is required"))?;
    debug!(remember_me = ?input.remember_me, "login command");

    Ok(state.with_store_mut(|store| store.customers_mut().login(email, password))?)
}

/// Ends the caller's session. Always succeeds.
pub fn logout(state: &AppState, session: Option<&str>) -> SuccessResult {
    debug!("logout command");
    if let Some(token) = customer_token(session) {
        state.with_store_mut(|store| store.customers_mut().logout(token));
    }
    SuccessResult::ok()
}

/// The customer behind the caller's session, or `None`.
pub fn get_active_customer(state: &AppState, session: Option<&str>) -> Option<Customer> {
    debug!("get_active_customer command");
    let token = customer_token(session)?;
    state.with_store(|store| store.customers().active_customer(token))
}

/// The active customer's addresses, empty without a customer.
pub fn get_addresses(state: &AppState, session: Option<&str>) -> Vec<Address> {
    debug!("get_addresses command");
    match customer_token(session) {
        Some(token) => state.with_store(|store| store.customers().addresses(token)),
        None => Vec::new(),
    }
}

/// Registers a customer account. The new account is not logged in.
///
/// ## Errors
/// - `VALIDATION_ERROR` if email, first name or last name is missing
/// - `EMAIL_ADDRESS_CONFLICT_ERROR` if the email already has an account
pub fn register(state: &AppState, input: RegisterInput) -> Result<SuccessResult, ApiError> {
    let email = validate_email(input.email_address.as_deref().unwrap_or_default())?;
    let first_name = require_present("firstName", input.first_name.as_deref())?;
    let last_name = require_present("lastName", input.last_name.as_deref())?;
    debug!("register command");

    let register = RegisterCustomerInput {
        email_address: email.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        password: input.password.filter(|p| !p.is_empty()),
    };

    state.with_store_mut(|store| store.customers_mut().register(register))?;
    Ok(SuccessResult::ok())
}

/// Verifies an account. The token is not checked; see `AccountStubPolicy`.
pub fn verify_account(state: &AppState, input: AccountTokenInput) -> Result<CurrentUser, ApiError> {
    let token = require_present("token", input.token.as_deref())?;
    debug!("verify_account command");

    Ok(state.with_store(|store| {
        store
            .customers()
            .verify_account(token, input.password.as_deref())
    })?)
}

/// Requests a password reset email. Succeeds for every address.
pub fn request_password_reset(
    state: &AppState,
    input: PasswordResetRequestInput,
) -> Result<SuccessResult, ApiError> {
    let email = require_present("emailAddress", input.email_address.as_deref())?;
    debug!("request_password_reset command");

    state.with_store(|store| store.customers().request_password_reset(email));
    Ok(SuccessResult::ok())
}

/// Resets a password. The token is not checked; see `AccountStubPolicy`.
pub fn reset_password(state: &AppState, input: AccountTokenInput) -> Result<CurrentUser, ApiError> {
    let token = require_present("token", input.token.as_deref())?;
    let password = require_present("password", input.password.as_deref())?;
    debug!("reset_password command");

    Ok(state.with_store(|store| store.customers().reset_password(token, password))?)
}

// =============================================================================
// Unit Tests
// =============================================================================
