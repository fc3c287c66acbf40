//! # Shop Settings
//!
//! Static configuration tables: shipping methods, payment methods,
//! countries and the default shipping zone.
//!
//! Nothing here changes after startup. The order repository holds an
//! `Arc<ShopSettings>` to resolve shipping method ids.

use chrono::Utc;
use shopfront_core::{Channel, Country, PaymentMethodInfo, ShippingMethod, ShippingZone};
use tracing::debug;
use uuid::Uuid;

/// Read-only shop configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopSettings {
    shipping_methods: Vec<ShippingMethod>,
    payment_methods: Vec<PaymentMethodInfo>,
    countries: Vec<Country>,
    default_zone: ShippingZone,
}

impl Default for ShopSettings {
    fn default() -> Self {
        ShopSettings::new(Vec::new(), Vec::new(), Vec::new())
    }
}

impl ShopSettings {
    /// Creates settings whose default zone contains every country.
    pub fn new(
        shipping_methods: Vec<ShippingMethod>,
        payment_methods: Vec<PaymentMethodInfo>,
        countries: Vec<Country>,
    ) -> Self {
        let default_zone = ShippingZone {
            id: "zone-1".to_string(),
            name: "Default Shipping Zone".to_string(),
            members: countries.clone(),
        };

        ShopSettings {
            shipping_methods,
            payment_methods,
            countries,
            default_zone,
        }
    }

    pub fn list_shipping_methods(&self) -> &[ShippingMethod] {
        &self.shipping_methods
    }

    /// Resolves a shipping method id.
    pub fn shipping_method(&self, id: &str) -> Option<&ShippingMethod> {
        self.shipping_methods.iter().find(|m| m.id == id)
    }

    /// Payment methods checkout may offer.
    pub fn list_eligible_payment_methods(&self) -> Vec<PaymentMethodInfo> {
        self.payment_methods
            .iter()
            .filter(|m| m.is_eligible)
            .cloned()
            .collect()
    }

    /// Every payment method, eligible or not.
    pub fn list_all_payment_methods(&self) -> &[PaymentMethodInfo] {
        &self.payment_methods
    }

    pub fn list_countries(&self) -> &[Country] {
        &self.countries
    }

    /// The active channel and its default shipping zone.
    pub fn active_channel(&self) -> Channel {
        Channel {
            default_shipping_zone: self.default_zone.clone(),
        }
    }

    /// Creates an opaque payment intent client secret.
    ///
    /// Format: `pi_mock_<unix millis>_secret_<random>`. No gateway is contacted.
    pub fn create_payment_intent(&self) -> String {
        let random = Uuid::new_v4().simple().to_string();
        let secret = format!(
            "pi_mock_{}_secret_{}",
            Utc::now().timestamp_millis(),
            &random[..12]
        );
        debug!("Created payment intent");
        secret
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
