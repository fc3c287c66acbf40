//! # Order Commands
//!
//! The cart and checkout flow for the caller's active order.
//!
//! ## Checkout Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Lifecycle                                   │
//! │                                                                         │
//! │  ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌────────────────┐    │
//! │  │  Empty   │───►│ In Cart  │───►│ Shipping │───►│ PaymentSettled │    │
//! │  │  (null)  │    │          │    │ + Coupon │    │  (retired)     │    │
//! │  └──────────┘    └──────────┘    └──────────┘    └────────────────┘    │
//! │                       │               │                  │              │
//! │                  addItemToOrder  setOrderShipping*   addPaymentToOrder  │
//! │                  adjustOrderLine applyCouponCode          │              │
//! │                  removeOrderLine removeCouponCode         ▼              │
//! │                                                  next call starts a     │
//! │                                                  fresh empty order      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Order commands run for guests too: a missing token is the anonymous
//! session.

use std::collections::BTreeMap;

use serde::Deserialize;
use shopfront_core::validation::{require_present, validate_price, validate_quantity};
use shopfront_core::{
    AddPaymentInput, Money, Order, PaginatedList, PaymentMetadata, SetCustomerInput,
    ShippingAddressInput, VariantInfo, DEFAULT_HISTORY_TAKE,
};
use tracing::debug;

use crate::commands::PageInput;
use crate::error::ApiError;
use crate::session::order_token;
use crate::state::AppState;

/// Variant info used when neither the caller nor the catalog knows the variant.
fn fallback_variant_info() -> VariantInfo {
    VariantInfo::new("Product Variant", "SKU-DEFAULT", Money::zero())
}

// =============================================================================
// Inputs
// =============================================================================

/// Input for `addItemToOrder`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemInput {
    #[serde(default)]
    pub variant_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    /// Name, SKU and price to freeze onto the line. Looked up in the
    /// catalog when missing.
    #[serde(default)]
    pub variant_info: Option<VariantInfo>,
}

/// Input for `removeOrderLine` and `adjustOrderLine`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineInput {
    #[serde(default)]
    pub order_line_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
}

/// Input for `applyCouponCode` and `removeCouponCode`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponInput {
    #[serde(default)]
    pub coupon_code: Option<String>,
}

/// Input for `setOrderShippingAddress`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub street_line1: Option<String>,
    #[serde(default)]
    pub street_line2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

/// Input for `setOrderShippingMethod`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethodInput {
    #[serde(default)]
    pub shipping_method_id: Option<String>,
}

/// Input for `setCustomerForOrder`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Input for `setOrderCustomFields`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldsInput {
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
}

/// Input for `addPaymentToOrder`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub metadata: Option<PaymentMetadata>,
}

/// Input for `transitionOrderToState`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionInput {
    #[serde(default)]
    pub state: Option<String>,
}

// =============================================================================
// Queries
// =============================================================================

/// Gets the caller's active order.
///
/// An untouched cart (no lines, still `AddingItems`) is reported as `None`,
/// although the order itself has been created.
pub fn get_active_order(state: &AppState, session: Option<&str>) -> Option<Order> {
    let token = order_token(session);
    debug!(token = %token, "get_active_order command");

    let order = state.with_store_mut(|store| store.orders_mut().active_order(token));
    (!order.is_empty_cart()).then_some(order)
}

/// Gets any order by its code, active or retired.
pub fn get_order_by_code(state: &AppState, code: Option<&str>) -> Result<Order, ApiError> {
    let code = require_present("code", code)?;
    debug!(code = %code, "get_order_by_code command");

    Ok(state.with_store(|store| store.orders().order_by_code(code))?)
}

/// Gets placed orders, oldest first.
pub fn get_order_history(
    state: &AppState,
    session: Option<&str>,
    page: PageInput,
) -> PaginatedList<Order> {
    let token = order_token(session);
    let (skip, take) = page.window(DEFAULT_HISTORY_TAKE);
    debug!(token = %token, skip, take, "get_order_history command");

    state.with_store(|store| store.orders().history(token, skip, take))
}

// =============================================================================
// Lines
// =============================================================================

/// Adds a variant to the active order.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  User clicks "Add to cart" on a product page                           │
/// │                    │                                                    │
/// │                    ▼                                                    │
/// │  { op: "addItemToOrder", variantId: "var-1-1", quantity: 1 }           │
/// │                    │                                                    │
/// │                    ▼                                                    │
/// │  ┌────────────────────────────────────────────────────────────────┐    │
/// │  │  1. Validate variantId and quantity                            │    │
/// │  │  2. Resolve variant info (request ▸ catalog ▸ placeholder)     │    │
/// │  │  3. Merge into the existing line or append a new one           │    │
/// │  │  4. Return the recalculated order                              │    │
/// │  └────────────────────────────────────────────────────────────────┘    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// ## Errors
/// `VALIDATION_ERROR` for a missing variant id, a quantity that is missing
/// or outside `1..=MAX_LINE_QUANTITY`, a caller price outside
/// `0..=MAX_UNIT_PRICE`, or totals that would overflow.
pub fn add_item_to_order(
    state: &AppState,
    session: Option<&str>,
    input: AddItemInput,
) -> Result<Order, ApiError> {
    let variant_id = require_present("variantId", input.variant_id.as_deref())?;
    let quantity = input
        .quantity
        .ok_or_else(|| ApiError::validation("quantity is required"))?;
    validate_quantity(quantity)?;
    if let Some(info) = &input.variant_info {
        validate_price(info.price)?;
    }
    let token = order_token(session);
    debug!(token = %token, variant_id = %variant_id, quantity, "add_item_to_order command");

    let order = state.with_store_mut(|store| {
        let info = input
            .variant_info
            .or_else(|| store.catalog().variant_info(variant_id))
            .unwrap_or_else(fallback_variant_info);

        store.orders_mut().add_item(token, variant_id, quantity, &info)
    })?;

    Ok(order)
}

/// Removes a line from the active order.
pub fn remove_order_line(
    state: &AppState,
    session: Option<&str>,
    input: OrderLineInput,
) -> Result<Order, ApiError> {
    let line_id = require_present("orderLineId", input.order_line_id.as_deref())?;
    let token = order_token(session);
    debug!(token = %token, line_id = %line_id, "remove_order_line command");

    Ok(state.with_store_mut(|store| store.orders_mut().remove_item(token, line_id))?)
}

/// Sets a line's quantity. Zero or less removes the line.
pub fn adjust_order_line(
    state: &AppState,
    session: Option<&str>,
    input: OrderLineInput,
) -> Result<Order, ApiError> {
    let line_id = require_present("orderLineId", input.order_line_id.as_deref())?;
    let quantity = input
        .quantity
        .ok_or_else(|| ApiError::validation("quantity is required"))?;
    let token = order_token(session);
    debug!(token = %token, line_id = %line_id, quantity, "adjust_order_line command");

    Ok(state.with_store_mut(|store| store.orders_mut().adjust_line(token, line_id, quantity))?)
}

// =============================================================================
// Coupons
// =============================================================================

/// Applies a coupon code (case-insensitive).
pub fn apply_coupon_code(
    state: &AppState,
    session: Option<&str>,
    input: CouponInput,
) -> Result<Order, ApiError> {
    let code = require_present("couponCode", input.coupon_code.as_deref())?;
    let token = order_token(session);
    debug!(token = %token, coupon = %code, "apply_coupon_code command");

    Ok(state.with_store_mut(|store| store.orders_mut().apply_coupon(token, code))?)
}

/// Removes a coupon code. Removing one that is not applied is not an error.
pub fn remove_coupon_code(
    state: &AppState,
    session: Option<&str>,
    input: CouponInput,
) -> Result<Order, ApiError> {
    let code = require_present("couponCode", input.coupon_code.as_deref())?;
    let token = order_token(session);
    debug!(token = %token, coupon = %code, "remove_coupon_code command");

    Ok(state.with_store_mut(|store| store.orders_mut().remove_coupon(token, code))?)
}

// =============================================================================
// Shipping & Customer
// =============================================================================

/// Sets the shipping address and, unless a method was chosen, the flat rate.
pub fn set_order_shipping_address(
    state: &AppState,
    session: Option<&str>,
    input: AddressInput,
) -> Result<Order, ApiError> {
    let street_line1 = require_present("streetLine1", input.street_line1.as_deref())?;
    let country_code = require_present("countryCode", input.country_code.as_deref())?;
    let token = order_token(session);
    debug!(token = %token, country_code = %country_code, "set_order_shipping_address command");

    let address = ShippingAddressInput {
        full_name: input.full_name.clone(),
        street_line1: street_line1.to_string(),
        street_line2: input.street_line2.clone(),
        city: input.city.clone(),
        postal_code: input.postal_code.clone(),
        country_code: country_code.to_string(),
    };

    Ok(state.with_store_mut(|store| store.orders_mut().set_shipping_address(token, address))?)
}

/// Selects a shipping method by id.
pub fn set_order_shipping_method(
    state: &AppState,
    session: Option<&str>,
    input: ShippingMethodInput,
) -> Result<Order, ApiError> {
    let method_id = require_present("shippingMethodId", input.shipping_method_id.as_deref())?;
    let token = order_token(session);
    debug!(token = %token, method_id = %method_id, "set_order_shipping_method command");

    Ok(state.with_store_mut(|store| store.orders_mut().set_shipping_method(token, method_id))?)
}

/// Attaches a guest customer to the active order.
pub fn set_customer_for_order(
    state: &AppState,
    session: Option<&str>,
    input: CustomerInput,
) -> Result<Order, ApiError> {
    let email = require_present("emailAddress", input.email_address.as_deref())?;
    let first_name = require_present("firstName", input.first_name.as_deref())?;
    let last_name = require_present("lastName", input.last_name.as_deref())?;
    let token = order_token(session);
    debug!(token = %token, "set_customer_for_order command");

    let customer = SetCustomerInput {
        email_address: email.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    };

    Ok(state.with_store_mut(|store| store.orders_mut().set_customer(token, customer)))
}

/// Merges free-form string fields into the active order.
pub fn set_order_custom_fields(
    state: &AppState,
    session: Option<&str>,
    input: CustomFieldsInput,
) -> Order {
    let token = order_token(session);
    debug!(token = %token, fields = input.custom_fields.len(), "set_order_custom_fields command");

    state.with_store_mut(|store| store.orders_mut().set_custom_fields(token, input.custom_fields))
}

// =============================================================================
// Payment & State
// =============================================================================

/// Pays for the active order.
///
/// ## Errors
/// - `PAYMENT_DECLINED_ERROR` when `metadata.shouldDecline` is set
/// - `PAYMENT_FAILED_ERROR` when `metadata.shouldError` is set
///
/// The attempt stays recorded on the order either way.
pub fn add_payment_to_order(
    state: &AppState,
    session: Option<&str>,
    input: PaymentInput,
) -> Result<Order, ApiError> {
    let method = require_present("method", input.method.as_deref())?;
    let token = order_token(session);
    debug!(token = %token, method = %method, "add_payment_to_order command");

    let payment = AddPaymentInput {
        method: method.to_string(),
        metadata: input.metadata.unwrap_or_default(),
    };

    Ok(state.with_store_mut(|store| store.orders_mut().add_payment(token, payment))?)
}

/// Moves the active order to the named state.
pub fn transition_order_to_state(
    state: &AppState,
    session: Option<&str>,
    input: TransitionInput,
) -> Result<Order, ApiError> {
    let target = require_present("state", input.state.as_deref())?;
    let token = order_token(session);
    debug!(token = %token, target = %target, "transition_order_to_state command");

    Ok(state.with_store_mut(|store| store.orders_mut().transition(token, target))?)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;
    use shopfront_core::OrderState;
    use shopfront_store::{Store, StoreConfig};

    fn demo_state() -> AppState {
        AppState::new(Store::seeded(StoreConfig::default()).unwrap())
    }

    fn add(state: &AppState, session: Option<&str>, variant_id: &str, quantity: i64) -> Order {
        add_item_to_order(
            state,
            session,
            AddItemInput {
                variant_id: Some(variant_id.to_string()),
                quantity: Some(quantity),
                variant_info: None,
            },
        )
        .unwrap()
    }

    fn coupon(code: &str) -> CouponInput {
        CouponInput {
            coupon_code: Some(code.to_string()),
        }
    }

    #[test]
    fn test_empty_cart_reports_none() {
        let state = demo_state();
        assert!(get_active_order(&state, None).is_none());

        add(&state, None, "var-1-1", 1);
        assert!(get_active_order(&state, None).is_some());
    }

    #[test]
    fn test_guest_checkout_scenario() {
        let state = demo_state();

        let order = add(&state, None, "var-1-1", 1);
        assert_eq!(order.sub_total.minor(), 99900);

        let order = add(&state, None, "var-1-1", 2);
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].quantity, 3);
        assert_eq!(order.lines[0].line_price_with_tax.minor(), 299700);

        let order = apply_coupon_code(&state, None, coupon("save10")).unwrap();
        assert_eq!(order.total_with_tax.minor(), 298700);

        let err = apply_coupon_code(&state, None, coupon("SAVE10")).unwrap_err();
        assert_eq!(err.code, ErrorCode::CouponCodeAlreadyAppliedError);
    }

    #[test]
    fn test_catalog_fills_variant_info() {
        let state = demo_state();
        let order = add(&state, None, "var-6-2", 1);
        assert_eq!(order.lines[0].product_variant.sku, "LAMP-DESK-BK");
        assert_eq!(order.lines[0].unit_price_with_tax.minor(), 4900);
    }

    #[test]
    fn test_unknown_variant_uses_placeholder() {
        let state = demo_state();
        let order = add(&state, None, "var-unknown", 2);
        assert_eq!(order.lines[0].product_variant.sku, "SKU-DEFAULT");
        assert_eq!(order.lines[0].product_variant.name, "Product Variant");
        assert_eq!(order.sub_total.minor(), 0);
    }

    #[test]
    fn test_caller_variant_info_wins() {
        let state = demo_state();
        let info: VariantInfo = serde_json::from_value(json!({
            "name": "Custom",
            "sku": "CUSTOM-1",
            "price": 1234
        }))
        .unwrap();

        let order = add_item_to_order(
            &state,
            None,
            AddItemInput {
                variant_id: Some("var-1-1".to_string()),
                quantity: Some(1),
                variant_info: Some(info),
            },
        )
        .unwrap();
        assert_eq!(order.sub_total.minor(), 1234);
    }

    #[test]
    fn test_add_item_validation_touches_nothing() {
        let state = demo_state();

        let err = add_item_to_order(&state, None, AddItemInput::default()).unwrap_err();
        assert_eq!(err.message, "variantId is required");

        let err = add_item_to_order(
            &state,
            None,
            AddItemInput {
                variant_id: Some("var-1-1".to_string()),
                quantity: None,
                variant_info: None,
            },
        )
        .unwrap_err();
        assert_eq!(err.message, "quantity is required");

        assert_eq!(state.with_store(|store| store.orders().len()), 0);
    }

    #[test]
    fn test_out_of_range_quantity_is_rejected_and_store_stays_usable() {
        let state = demo_state();

        for quantity in [0, 9_223_372_036_854_775, i64::MAX] {
            let err = add_item_to_order(
                &state,
                None,
                AddItemInput {
                    variant_id: Some("var-1-1".to_string()),
                    quantity: Some(quantity),
                    variant_info: None,
                },
            )
            .unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError);
        }
        assert_eq!(state.with_store(|store| store.orders().len()), 0);

        let order = add(&state, None, "var-1-1", 1);
        assert_eq!(order.sub_total.minor(), 99900);
    }

    #[test]
    fn test_caller_price_is_bounded() {
        let state = demo_state();
        let info = VariantInfo::new("Yacht", "YACHT", Money::from_minor(i64::MAX));

        let err = add_item_to_order(
            &state,
            None,
            AddItemInput {
                variant_id: Some("var-1-1".to_string()),
                quantity: Some(1),
                variant_info: Some(info),
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "price must be at most 1000000000");
        assert_eq!(state.with_store(|store| store.orders().len()), 0);
    }

    #[test]
    fn test_adjust_to_extreme_quantity_keeps_line() {
        let state = demo_state();
        let order = add(&state, None, "var-3-1", 2);
        let line_id = order.lines[0].id.clone();

        let err = adjust_order_line(
            &state,
            None,
            OrderLineInput {
                order_line_id: Some(line_id.clone()),
                quantity: Some(i64::MAX),
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let order = get_active_order(&state, None).unwrap();
        assert_eq!(order.lines[0].quantity, 2);
        assert_eq!(order.sub_total.minor(), 2 * 24900);
    }

    #[test]
    fn test_adjust_to_zero_removes_line() {
        let state = demo_state();
        let order = add(&state, None, "var-3-1", 2);
        let line_id = order.lines[0].id.clone();

        let order = adjust_order_line(
            &state,
            None,
            OrderLineInput {
                order_line_id: Some(line_id.clone()),
                quantity: Some(0),
            },
        )
        .unwrap();
        assert!(order.lines.is_empty());
        assert_eq!(order.total_with_tax.minor(), 0);

        let err = remove_order_line(
            &state,
            None,
            OrderLineInput {
                order_line_id: Some(line_id),
                quantity: None,
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderLineNotFound);
    }

    #[test]
    fn test_remove_coupon_not_applied_is_fine() {
        let state = demo_state();
        add(&state, None, "var-3-1", 1);
        let order = remove_coupon_code(&state, None, coupon("WELCOME")).unwrap();
        assert!(order.discounts.is_empty());
    }

    #[test]
    fn test_method_then_address_keeps_method_price() {
        let state = demo_state();
        add(&state, None, "var-3-1", 1);

        set_order_shipping_method(
            &state,
            None,
            ShippingMethodInput {
                shipping_method_id: Some("ship-2".to_string()),
            },
        )
        .unwrap();

        let order = set_order_shipping_address(
            &state,
            None,
            AddressInput {
                street_line1: Some("1 Infinite Loop".to_string()),
                country_code: Some("US".to_string()),
                ..AddressInput::default()
            },
        )
        .unwrap();
        assert_eq!(order.shipping_with_tax.minor(), 1999);
    }

    #[test]
    fn test_shipping_address_requires_street_and_country() {
        let state = demo_state();
        let err = set_order_shipping_address(&state, None, AddressInput::default()).unwrap_err();
        assert_eq!(err.message, "streetLine1 is required");
    }

    #[test]
    fn test_unknown_shipping_method() {
        let state = demo_state();
        let err = set_order_shipping_method(
            &state,
            None,
            ShippingMethodInput {
                shipping_method_id: Some("ship-99".to_string()),
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidShippingMethod);
    }

    #[test]
    fn test_payment_retires_order_per_session() {
        let state = demo_state();
        let session = Some("Bearer shopper-1");

        let placed = add(&state, session, "var-4-1", 1);
        let paid = add_payment_to_order(
            &state,
            session,
            PaymentInput {
                method: Some("credit-card".to_string()),
                metadata: None,
            },
        )
        .unwrap();
        assert_eq!(paid.state, OrderState::PaymentSettled);
        assert!(paid.order_placed_at.is_some());

        assert!(get_active_order(&state, session).is_none());

        let found = get_order_by_code(&state, Some(&placed.code)).unwrap();
        assert_eq!(found.state, OrderState::PaymentSettled);

        let history = get_order_history(&state, session, PageInput::default());
        assert_eq!(history.total_items, 1);
    }

    #[test]
    fn test_declined_payment_keeps_order_active() {
        let state = demo_state();
        add(&state, None, "var-4-1", 1);

        let err = add_payment_to_order(
            &state,
            None,
            PaymentInput {
                method: Some("credit-card".to_string()),
                metadata: Some(PaymentMetadata {
                    should_decline: true,
                    should_error: false,
                }),
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentDeclinedError);

        let order = get_active_order(&state, None).unwrap();
        assert_eq!(order.payments.len(), 1);
        assert_eq!(order.state, OrderState::AddingItems);
    }

    #[test]
    fn test_transition_errors_carry_states() {
        let state = demo_state();
        let err = transition_order_to_state(
            &state,
            None,
            TransitionInput {
                state: Some("Shipped".to_string()),
            },
        )
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::OrderStateTransitionError);
        assert_eq!(err.extra["fromState"], json!("AddingItems"));
        assert_eq!(err.extra["toState"], json!("Shipped"));

        let order = transition_order_to_state(
            &state,
            None,
            TransitionInput {
                state: Some("ArrangingPayment".to_string()),
            },
        )
        .unwrap();
        assert_eq!(order.state, OrderState::ArrangingPayment);
    }

    #[test]
    fn test_order_by_code_not_found() {
        let state = demo_state();
        let err = get_order_by_code(&state, Some("ORD-00000000")).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Order not found: ORD-00000000");
    }

    #[test]
    fn test_guest_customer_and_custom_fields() {
        let state = demo_state();
        let order = set_customer_for_order(
            &state,
            None,
            CustomerInput {
                email_address: Some("guest@example.com".to_string()),
                first_name: Some("Gus".to_string()),
                last_name: Some("Guest".to_string()),
            },
        )
        .unwrap();
        let customer = order.customer.unwrap();
        assert!(customer.id.starts_with("guest-"));

        let mut fields = BTreeMap::new();
        fields.insert("giftNote".to_string(), "Happy birthday".to_string());
        let order = set_order_custom_fields(&state, None, CustomFieldsInput { custom_fields: fields });
        assert_eq!(order.custom_fields["giftNote"], "Happy birthday");
    }
}
