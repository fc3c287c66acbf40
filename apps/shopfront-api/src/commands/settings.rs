//! # Settings Commands
//!
//! Read-only shop configuration for the checkout screens, plus the mock
//! payment intent.

use shopfront_core::{Channel, Country, PaymentMethodInfo, ShippingMethod};
use tracing::debug;

use crate::state::AppState;

pub fn get_shipping_methods(state: &AppState) -> Vec<ShippingMethod> {
    debug!("get_shipping_methods command");
    state.with_store(|store| store.settings().list_shipping_methods().to_vec())
}

/// Payment methods the checkout may offer (`isEligible` only).
pub fn get_eligible_payment_methods(state: &AppState) -> Vec<PaymentMethodInfo> {
    debug!("get_eligible_payment_methods command");
    state.with_store(|store| store.settings().list_eligible_payment_methods())
}

/// Every configured payment method, eligible or not.
pub fn get_payment_methods(state: &AppState) -> Vec<PaymentMethodInfo> {
    debug!("get_payment_methods command");
    state.with_store(|store| store.settings().list_all_payment_methods().to_vec())
}

pub fn get_countries(state: &AppState) -> Vec<Country> {
    debug!("get_countries command");
    state.with_store(|store| store.settings().list_countries().to_vec())
}

pub fn get_active_channel(state: &AppState) -> Channel {
    debug!("get_active_channel command");
    state.with_store(|store| store.settings().active_channel())
}

/// Creates a client secret for a payment intent. No gateway is contacted.
pub fn create_payment_intent(state: &AppState) -> String {
    debug!("create_payment_intent command");
    state.with_store(|store| store.settings().create_payment_intent())
}

// =============================================================================
// Unit Tests
// =============================================================================
