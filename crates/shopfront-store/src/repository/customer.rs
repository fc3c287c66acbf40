//! # Customer Repository
//!
//! Customer accounts and login sessions.
//!
//! ## Two Independent Maps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  accounts: email ──► CustomerAccount { customer, password_hash }        │
//! │                                                                         │
//! │  sessions: token ──► email                                              │
//! │                                                                         │
//! │  login    : verify hash, insert fresh token                             │
//! │  logout   : remove token (idempotent)                                   │
//! │  active   : token ──► email ──► customer (either hop may miss)          │
//! │                                                                         │
//! │  Orders keep their own token ──► order map, so a guest cart works       │
//! │  without any entry here.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use shopfront_core::{
    Address, CoreError, CurrentUser, Customer, LoginResult, RegisterCustomerInput,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::credential::{hash_password, verify_password};
use crate::error::StoreResult;
use crate::store::AccountStubPolicy;

/// Password given to accounts registered without one.
pub const DEFAULT_PASSWORD: &str = "defaultPassword123";

/// A customer plus the credential the public view never carries.
#[derive(Debug, Clone)]
struct CustomerAccount {
    customer: Customer,
    password_hash: String,
}

/// Repository for customers and sessions.
#[derive(Debug, Clone, Default)]
pub struct CustomerRepository {
    accounts: HashMap<String, CustomerAccount>,
    sessions: HashMap<String, String>,
    stub_policy: AccountStubPolicy,
}

impl CustomerRepository {
    /// Creates an empty repository.
    pub fn new(stub_policy: AccountStubPolicy) -> Self {
        CustomerRepository {
            accounts: HashMap::new(),
            sessions: HashMap::new(),
            stub_policy,
        }
    }

    /// Stores a fully-formed customer with a password (used by seeding).
    ///
    /// Replaces any account with the same email.
    pub fn insert(&mut self, customer: Customer, password: &str) -> StoreResult<()> {
        let password_hash = hash_password(password)?;
        self.accounts.insert(
            customer.email_address.clone(),
            CustomerAccount {
                customer,
                password_hash,
            },
        );
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Sessions
    // -------------------------------------------------------------------------

    /// Logs in and opens a new session.
    ///
    /// ## Errors
    /// `InvalidCredentials` for an unknown email and for a wrong password alike.
    pub fn login(&mut self, email: &str, password: &str) -> StoreResult<LoginResult> {
        let account = self
            .accounts
            .get(email)
            .filter(|account| verify_password(password, &account.password_hash));

        let Some(account) = account else {
            warn!("Login rejected");
            return Err(CoreError::InvalidCredentials.into());
        };

        let current_user = account.customer.user.clone();
        let token = Uuid::new_v4().to_string();
        self.sessions.insert(token.clone(), email.to_string());

        info!(user_id = %current_user.id, "Customer logged in");
        Ok(LoginResult {
            token,
            current_user,
        })
    }

    /// Ends a session. Unknown tokens are fine.
    pub fn logout(&mut self, token: &str) {
        if self.sessions.remove(token).is_some() {
            info!("Customer logged out");
        }
    }

    /// The customer behind a session token.
    pub fn active_customer(&self, token: &str) -> Option<Customer> {
        let email = self.sessions.get(token)?;
        self.accounts
            .get(email)
            .map(|account| account.customer.clone())
    }

    /// Addresses of the customer behind a session token.
    pub fn addresses(&self, token: &str) -> Vec<Address> {
        self.active_customer(token)
            .map(|customer| customer.addresses)
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Accounts
    // -------------------------------------------------------------------------

    /// Creates an account. The new account has no session.
    ///
    /// ## Errors
    /// `EmailAddressConflict` if the email already has an account.
    pub fn register(&mut self, input: RegisterCustomerInput) -> StoreResult<Customer> {
        if self.accounts.contains_key(&input.email_address) {
            return Err(CoreError::EmailAddressConflict {
                email: input.email_address,
            }
            .into());
        }

        let password = input.password.as_deref().unwrap_or(DEFAULT_PASSWORD);
        let customer = Customer {
            id: format!("cust-{}", Uuid::new_v4()),
            title: None,
            first_name: input.first_name,
            last_name: input.last_name,
            email_address: input.email_address.clone(),
            phone_number: None,
            addresses: Vec::new(),
            user: CurrentUser {
                id: format!("user-{}", Uuid::new_v4()),
                identifier: input.email_address,
            },
        };

        self.insert(customer.clone(), password)?;
        info!(customer_id = %customer.id, "Customer registered");
        Ok(customer)
    }

    /// Verifies an account from an emailed token.
    ///
    /// No token is checked. The outcome is decided by the stub policy.
    pub fn verify_account(&self, _token: &str, _password: Option<&str>) -> StoreResult<CurrentUser> {
        debug!(policy = ?self.stub_policy, "Account verification requested");
        match self.stub_policy {
            AccountStubPolicy::AcceptAll => Ok(CurrentUser {
                id: "user-verified".to_string(),
                identifier: "verified@example.com".to_string(),
            }),
            AccountStubPolicy::RejectAll => Err(CoreError::VerificationTokenInvalid.into()),
        }
    }

    /// Requests a password reset email. Always succeeds, for every address.
    pub fn request_password_reset(&self, _email: &str) {
        debug!("Password reset requested");
    }

    /// Resets a password from an emailed token.
    ///
    /// No token is checked and no password changes. The outcome is decided
    /// by the stub policy.
    pub fn reset_password(&self, _token: &str, _password: &str) -> StoreResult<CurrentUser> {
        debug!(policy = ?self.stub_policy, "Password reset submitted");
        match self.stub_policy {
            AccountStubPolicy::AcceptAll => Ok(CurrentUser {
                id: "user-reset".to_string(),
                identifier: "reset@example.com".to_string(),
            }),
            AccountStubPolicy::RejectAll => Err(CoreError::VerificationTokenInvalid.into()),
        }
    }

    /// Number of open sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::seed::seed_customers;

    fn seeded() -> CustomerRepository {
        let mut repo = CustomerRepository::new(AccountStubPolicy::AcceptAll);
        seed_customers(&mut repo).unwrap();
        repo
    }

    fn code(err: &StoreError) -> &'static str {
        err.as_core().map(CoreError::code).unwrap_or("NONE")
    }

    #[test]
    fn test_login_and_active_customer() {
        let mut repo = seeded();

        let result = repo.login("demo@example.com", "password123").unwrap();
        assert_eq!(result.current_user.id, "user-1");
        assert_eq!(result.current_user.identifier, "demo@example.com");

        let customer = repo.active_customer(&result.token).unwrap();
        assert_eq!(customer.id, "cust-1");
        assert_eq!(customer.first_name, "John");
        assert_eq!(customer.addresses[0].street_line2.as_deref(), Some("Apt 4B"));
    }

    #[test]
    fn test_login_failures_are_indistinguishable() {
        let mut repo = seeded();

        let wrong_password = repo.login("demo@example.com", "password124").unwrap_err();
        let unknown_email = repo.login("nobody@example.com", "password123").unwrap_err();

        assert_eq!(code(&wrong_password), "INVALID_CREDENTIALS_ERROR");
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(code(&wrong_password), code(&unknown_email));
        assert_eq!(repo.session_count(), 0);
    }

    #[test]
    fn test_each_login_gets_a_fresh_token() {
        let mut repo = seeded();
        let a = repo.login("jane@example.com", "password456").unwrap();
        let b = repo.login("jane@example.com", "password456").unwrap();
        assert_ne!(a.token, b.token);
        assert_eq!(repo.session_count(), 2);
    }

    #[test]
    fn test_logout_is_idempotent() {
        let mut repo = seeded();
        let result = repo.login("demo@example.com", "password123").unwrap();

        repo.logout(&result.token);
        repo.logout(&result.token);
        repo.logout("never-issued");

        assert!(repo.active_customer(&result.token).is_none());
    }

    #[test]
    fn test_register_then_login() {
        let mut repo = seeded();
        let customer = repo
            .register(RegisterCustomerInput {
                email_address: "new@example.com".to_string(),
                first_name: "New".to_string(),
                last_name: "Shopper".to_string(),
                password: Some("hunter22".to_string()),
            })
            .unwrap();

        assert!(customer.id.starts_with("cust-"));
        assert_eq!(customer.user.identifier, "new@example.com");
        assert_eq!(repo.session_count(), 0);

        assert!(repo.login("new@example.com", "hunter22").is_ok());
    }

    #[test]
    fn test_register_without_password_uses_default() {
        let mut repo = seeded();
        repo.register(RegisterCustomerInput {
            email_address: "nopass@example.com".to_string(),
            first_name: "No".to_string(),
            last_name: "Pass".to_string(),
            password: None,
        })
        .unwrap();

        assert!(repo.login("nopass@example.com", DEFAULT_PASSWORD).is_ok());
    }

    #[test]
    fn test_register_conflict() {
        let mut repo = seeded();
        let err = repo
            .register(RegisterCustomerInput {
                email_address: "demo@example.com".to_string(),
                first_name: "Dup".to_string(),
                last_name: "Licate".to_string(),
                password: None,
            })
            .unwrap_err();

        assert_eq!(code(&err), "EMAIL_ADDRESS_CONFLICT_ERROR");
        assert_eq!(err.to_string(), "An account with this email already exists");
        assert!(repo.login("demo@example.com", "password123").is_ok());
    }

    #[test]
    fn test_addresses() {
        let mut repo = seeded();
        assert!(repo.addresses("no-session").is_empty());

        let result = repo.login("jane@example.com", "password456").unwrap();
        let addresses = repo.addresses(&result.token);
        assert_eq!(addresses.len(), 1);
        assert_eq!(addresses[0].id, "addr-2");
        assert_eq!(addresses[0].country.code, "US");
    }

    #[test]
    fn test_stub_policy_accept_all() {
        let repo = seeded();
        assert_eq!(repo.verify_account("anything", None).unwrap().id, "user-verified");
        assert_eq!(repo.reset_password("anything", "new").unwrap().id, "user-reset");
    }

    #[test]
    fn test_stub_policy_reject_all() {
        let repo = CustomerRepository::new(AccountStubPolicy::RejectAll);

        let err = repo.verify_account("anything", Some("pw")).unwrap_err();
        assert_eq!(code(&err), "VERIFICATION_TOKEN_INVALID_ERROR");

        let err = repo.reset_password("anything", "pw").unwrap_err();
        assert_eq!(code(&err), "VERIFICATION_TOKEN_INVALID_ERROR");

        repo.request_password_reset("nobody@example.com");
    }
}
