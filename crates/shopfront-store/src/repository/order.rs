//! # Order Repository
//!
//! The order table and the per-session active-order table.
//!
//! ## Active Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  token "abc" first touches the cart                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  active["abc"] missing ──► Order::new(fresh code) ──► orders.push       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  add_item / apply_coupon / set_shipping_* ... mutate that order         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  add_payment succeeds ──► active.remove("abc")                          │
//! │       │                   (order stays in `orders`, findable by code)   │
//! │       ▼                                                                 │
//! │  next touch creates a fresh order                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation resolves the active order first, so even a failing
//! mutation leaves an (empty) order behind for the token.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use shopfront_core::validation::{validate_price, validate_quantity};
use shopfront_core::{
    AddPaymentInput, CoreError, Order, OrderState, PaginatedList, SetCustomerInput,
    ShippingAddressInput, VariantInfo,
};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::repository::settings::ShopSettings;

/// Repository for orders.
///
/// ## Usage
/// ```rust
/// use std::sync::Arc;
/// use shopfront_core::{Money, VariantInfo};
/// use shopfront_store::{seed, OrderRepository};
///
/// let mut orders = OrderRepository::new("USD", Arc::new(seed::demo_settings()));
/// let info = VariantInfo::new("AirPods Pro 2 with USB-C", "APP2-USBC", Money::from_minor(24900));
///
/// let order = orders.add_item("anonymous", "var-3-1", 2, &info).unwrap();
/// assert_eq!(order.total_with_tax.minor(), 49800);
/// ```
#[derive(Debug, Clone)]
pub struct OrderRepository {
    /// Every order ever created, in creation order.
    orders: Vec<Order>,
    /// Order id → index into `orders`.
    by_id: HashMap<String, usize>,
    /// Issued order codes.
    codes: HashSet<String>,
    /// Session token → active order id.
    active: HashMap<String, String>,
    currency_code: String,
    settings: Arc<ShopSettings>,
}

impl OrderRepository {
    /// Creates an empty repository stamping `currency_code` on new orders.
    pub fn new(currency_code: impl Into<String>, settings: Arc<ShopSettings>) -> Self {
        OrderRepository {
            orders: Vec::new(),
            by_id: HashMap::new(),
            codes: HashSet::new(),
            active: HashMap::new(),
            currency_code: currency_code.into(),
            settings,
        }
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    /// Gets the active order for a token, creating it on first access.
    pub fn active_order(&mut self, token: &str) -> Order {
        self.active_order_mut(token).clone()
    }

    /// The active order if one exists, without creating one.
    pub fn peek_active_order(&self, token: &str) -> Option<&Order> {
        let id = self.active.get(token)?;
        self.by_id.get(id).map(|&index| &self.orders[index])
    }

    /// Finds any order (active or retired) by its code.
    pub fn order_by_code(&self, code: &str) -> StoreResult<Order> {
        self.orders
            .iter()
            .find(|order| order.code == code)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Order", code))
    }

    /// Every order that has left `AddingItems`, in creation order.
    ///
    /// The token is accepted for the caller's sake but does not filter.
    pub fn history(&self, _token: &str, skip: usize, take: usize) -> PaginatedList<Order> {
        let placed: Vec<Order> = self
            .orders
            .iter()
            .filter(|order| order.state != OrderState::AddingItems)
            .cloned()
            .collect();

        PaginatedList::paginate(placed, skip, take)
    }

    /// Number of orders in the table (active and retired).
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    fn active_order_mut(&mut self, token: &str) -> &mut Order {
        let existing = self
            .active
            .get(token)
            .and_then(|id| self.by_id.get(id))
            .copied();

        let index = match existing {
            Some(index) => index,
            None => self.create_order(token),
        };

        &mut self.orders[index]
    }

    fn create_order(&mut self, token: &str) -> usize {
        let mut code = Order::generate_code();
        while self.codes.contains(&code) {
            code = Order::generate_code();
        }

        let order = Order::new(code.clone(), self.currency_code.clone());
        let index = self.orders.len();

        debug!(order_id = %order.id, code = %code, "Created active order");

        self.codes.insert(code);
        self.by_id.insert(order.id.clone(), index);
        self.active.insert(token.to_string(), order.id.clone());
        self.orders.push(order);
        index
    }

    // -------------------------------------------------------------------------
    // Lines
    // -------------------------------------------------------------------------

    /// Adds a variant to the active order, merging with an existing line.
    ///
    /// ## Errors
    /// Validation error if `quantity` or the price is out of bounds, or the
    /// totals would overflow. A rejected input does not open an order.
    pub fn add_item(
        &mut self,
        token: &str,
        variant_id: &str,
        quantity: i64,
        info: &VariantInfo,
    ) -> StoreResult<Order> {
        validate_quantity(quantity)?;
        validate_price(info.price)?;

        let order = self.active_order_mut(token);
        order.add_item(variant_id, quantity, info)?;
        debug!(code = %order.code, variant_id = %variant_id, quantity, "Added item");
        Ok(order.clone())
    }

    /// Removes a line from the active order.
    pub fn remove_item(&mut self, token: &str, line_id: &str) -> StoreResult<Order> {
        let order = self.active_order_mut(token);
        order.remove_line(line_id)?;
        debug!(code = %order.code, line_id = %line_id, "Removed line");
        Ok(order.clone())
    }

    /// Sets a line's quantity. Zero or less removes the line.
    pub fn adjust_line(&mut self, token: &str, line_id: &str, quantity: i64) -> StoreResult<Order> {
        let order = self.active_order_mut(token);
        order.adjust_line(line_id, quantity)?;
        debug!(code = %order.code, line_id = %line_id, quantity, "Adjusted line");
        Ok(order.clone())
    }

    // -------------------------------------------------------------------------
    // Coupons
    // -------------------------------------------------------------------------

    pub fn apply_coupon(&mut self, token: &str, code: &str) -> StoreResult<Order> {
        let order = self.active_order_mut(token);
        order.apply_coupon(code)?;
        debug!(code = %order.code, coupon = %code, "Applied coupon");
        Ok(order.clone())
    }

    /// Removes a coupon. Not having it applied is not an error.
    pub fn remove_coupon(&mut self, token: &str, code: &str) -> StoreResult<Order> {
        let order = self.active_order_mut(token);
        if order.remove_coupon(code)? {
            debug!(code = %order.code, coupon = %code, "Removed coupon");
        }
        Ok(order.clone())
    }

    // -------------------------------------------------------------------------
    // Shipping, Customer, Custom Fields
    // -------------------------------------------------------------------------

    pub fn set_shipping_address(
        &mut self,
        token: &str,
        input: ShippingAddressInput,
    ) -> StoreResult<Order> {
        let order = self.active_order_mut(token);
        order.set_shipping_address(input)?;
        debug!(code = %order.code, shipping = order.shipping_with_tax.minor(), "Set shipping address");
        Ok(order.clone())
    }

    /// Selects a shipping method by id.
    ///
    /// ## Errors
    /// `InvalidShippingMethod` if the id is not configured.
    pub fn set_shipping_method(&mut self, token: &str, method_id: &str) -> StoreResult<Order> {
        let settings = Arc::clone(&self.settings);
        let order = self.active_order_mut(token);

        let method = settings
            .shipping_method(method_id)
            .ok_or_else(|| CoreError::InvalidShippingMethod {
                method_id: method_id.to_string(),
            })?;

        order.set_shipping_method(method)?;
        debug!(code = %order.code, method_id = %method_id, "Set shipping method");
        Ok(order.clone())
    }

    pub fn set_customer(&mut self, token: &str, input: SetCustomerInput) -> Order {
        let order = self.active_order_mut(token);
        order.set_customer(input);
        order.clone()
    }

    pub fn set_custom_fields(&mut self, token: &str, fields: BTreeMap<String, String>) -> Order {
        let order = self.active_order_mut(token);
        order.set_custom_fields(fields);
        order.clone()
    }

    // -------------------------------------------------------------------------
    // Payment & State
    // -------------------------------------------------------------------------

    /// Pays for the active order.
    ///
    /// The attempt is recorded on the order whatever the outcome. On success
    /// the order is settled and retired from the session.
    pub fn add_payment(&mut self, token: &str, input: AddPaymentInput) -> StoreResult<Order> {
        let order = self.active_order_mut(token);
        let method = input.method.clone();

        if let Err(err) = order.add_payment(input) {
            warn!(code = %order.code, method = %method, error = %err, "Payment rejected");
            return Err(err.into());
        }

        let settled = order.clone();
        self.active.remove(token);

        info!(code = %settled.code, total = settled.total_with_tax.minor(), "Order placed");
        Ok(settled)
    }

    /// Transitions the active order to the named state.
    pub fn transition(&mut self, token: &str, state: &str) -> StoreResult<Order> {
        let order = self.active_order_mut(token);
        let from = order.state;

        match order.transition(state) {
            Ok(to) => {
                info!(code = %order.code, %from, %to, "Order transitioned");
                Ok(order.clone())
            }
            Err(err) => {
                warn!(code = %order.code, %from, to = %state, "Rejected state transition");
                Err(err.into())
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::demo_settings;
    use shopfront_core::validation::MAX_LINE_QUANTITY;
    use shopfront_core::{Money, PaymentMetadata};

    const TOKEN: &str = "anonymous";

    fn repo() -> OrderRepository {
        OrderRepository::new("USD", Arc::new(demo_settings()))
    }

    fn iphone() -> VariantInfo {
        VariantInfo::new("iPhone 15 Pro 128GB Natural Titanium", "IP15P-128-NT", Money::from_minor(99900))
    }

    fn code_of(err: StoreError) -> &'static str {
        err.as_core().map(CoreError::code).unwrap_or("NONE")
    }

    #[test]
    fn test_active_order_is_created_once() {
        let mut repo = repo();
        let first = repo.active_order(TOKEN);
        let second = repo.active_order(TOKEN);

        assert_eq!(first.id, second.id);
        assert_eq!(first.currency_code, "USD");
        assert_eq!(repo.len(), 1);
        assert!(repo.peek_active_order("other").is_none());
    }

    #[test]
    fn test_sessions_have_separate_orders() {
        let mut repo = repo();
        repo.add_item("a", "var-1-1", 1, &iphone()).unwrap();
        let other = repo.active_order("b");

        assert!(other.lines.is_empty());
        assert_ne!(repo.active_order("a").code, other.code);
    }

    #[test]
    fn test_guest_checkout_scenario() {
        let mut repo = repo();

        let order = repo.add_item(TOKEN, "var-1-1", 1, &iphone()).unwrap();
        assert_eq!(order.sub_total.minor(), 99900);

        let order = repo.add_item(TOKEN, "var-1-1", 2, &iphone()).unwrap();
        assert_eq!(order.lines[0].quantity, 3);
        assert_eq!(order.lines[0].line_price_with_tax.minor(), 299700);

        let order = repo.apply_coupon(TOKEN, "SAVE10").unwrap();
        assert_eq!(order.total_with_tax.minor(), 298700);
    }

    #[test]
    fn test_add_item_rejects_non_positive_quantity() {
        let mut repo = repo();
        for quantity in [0, -1, i64::MIN] {
            let err = repo.add_item(TOKEN, "var-1-1", quantity, &iphone()).unwrap_err();
            assert_eq!(code_of(err), "VALIDATION_ERROR");
        }
        assert_eq!(repo.len(), 0);
        assert!(repo.peek_active_order(TOKEN).is_none());
    }

    #[test]
    fn test_add_item_rejects_out_of_range_input_without_opening_an_order() {
        let mut repo = repo();
        let err = repo
            .add_item(TOKEN, "var-1-1", 9_223_372_036_854_775, &iphone())
            .unwrap_err();
        assert_eq!(code_of(err), "VALIDATION_ERROR");

        let yacht = VariantInfo::new("Yacht", "YACHT", Money::from_minor(i64::MAX));
        let err = repo.add_item(TOKEN, "var-9-9", 1, &yacht).unwrap_err();
        assert_eq!(code_of(err), "VALIDATION_ERROR");

        assert_eq!(repo.len(), 0);
    }

    #[test]
    fn test_rejected_merge_and_adjust_keep_the_order() {
        let mut repo = repo();
        let order = repo.add_item(TOKEN, "var-1-1", MAX_LINE_QUANTITY, &iphone()).unwrap();
        let line_id = order.lines[0].id.clone();

        let err = repo.add_item(TOKEN, "var-1-1", MAX_LINE_QUANTITY, &iphone()).unwrap_err();
        assert_eq!(code_of(err), "VALIDATION_ERROR");
        let err = repo.adjust_line(TOKEN, &line_id, i64::MAX).unwrap_err();
        assert_eq!(code_of(err), "VALIDATION_ERROR");

        assert_eq!(repo.active_order(TOKEN), order);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_remove_and_adjust_unknown_line() {
        let mut repo = repo();
        assert_eq!(code_of(repo.remove_item(TOKEN, "nope").unwrap_err()), "ORDER_LINE_NOT_FOUND");
        assert_eq!(code_of(repo.adjust_line(TOKEN, "nope", 2).unwrap_err()), "ORDER_LINE_NOT_FOUND");
    }

    #[test]
    fn test_shipping_method_then_address() {
        let mut repo = repo();
        repo.set_shipping_method(TOKEN, "ship-2").unwrap();
        let order = repo.set_shipping_address(
            TOKEN,
            ShippingAddressInput {
                street_line1: "123 Main Street".to_string(),
                country_code: "US".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(order.shipping_with_tax.minor(), 1999);
    }

    #[test]
    fn test_unknown_shipping_method() {
        let mut repo = repo();
        let err = repo.set_shipping_method(TOKEN, "ship-42").unwrap_err();
        assert_eq!(code_of(err), "INVALID_SHIPPING_METHOD");
        assert!(repo.active_order(TOKEN).shipping_lines.is_empty());
    }

    #[test]
    fn test_successful_payment_retires_order() {
        let mut repo = repo();
        repo.add_item(TOKEN, "var-1-1", 1, &iphone()).unwrap();

        let placed = repo.add_payment(TOKEN, AddPaymentInput::new("credit-card")).unwrap();
        assert_eq!(placed.state, OrderState::PaymentSettled);
        assert!(placed.order_placed_at.is_some());
        assert!(repo.peek_active_order(TOKEN).is_none());

        let next = repo.active_order(TOKEN);
        assert_ne!(next.id, placed.id);
        assert!(next.is_empty_cart());

        let found = repo.order_by_code(&placed.code).unwrap();
        assert_eq!(found.id, placed.id);
    }

    #[test]
    fn test_declined_payment_keeps_order_active() {
        let mut repo = repo();
        repo.add_item(TOKEN, "var-1-1", 1, &iphone()).unwrap();

        let input = AddPaymentInput {
            method: "credit-card".to_string(),
            metadata: PaymentMetadata {
                should_decline: true,
                should_error: false,
            },
        };
        let err = repo.add_payment(TOKEN, input).unwrap_err();
        assert_eq!(code_of(err), "PAYMENT_DECLINED_ERROR");

        let order = repo.peek_active_order(TOKEN).unwrap();
        assert_eq!(order.payments.len(), 1);
        assert_eq!(order.state, OrderState::AddingItems);
    }

    #[test]
    fn test_transition_errors_do_not_mutate() {
        let mut repo = repo();
        let before = repo.active_order(TOKEN);

        let err = repo.transition(TOKEN, "Shipped").unwrap_err();
        assert_eq!(err.to_string(), "Cannot transition from AddingItems to Shipped");
        assert_eq!(repo.active_order(TOKEN), before);

        let order = repo.transition(TOKEN, "ArrangingPayment").unwrap();
        assert_eq!(order.state, OrderState::ArrangingPayment);
    }

    #[test]
    fn test_history_lists_placed_orders_in_creation_order() {
        let mut repo = repo();

        repo.add_item("a", "var-1-1", 1, &iphone()).unwrap();
        let first = repo.add_payment("a", AddPaymentInput::new("paypal")).unwrap();

        repo.active_order("idle");

        repo.transition("b", "ArrangingPayment").unwrap();
        let second = repo.active_order("b");

        let history = repo.history("whoever", 0, 10);
        assert_eq!(history.total_items, 2);
        let codes: Vec<_> = history.items.iter().map(|o| o.code.clone()).collect();
        assert_eq!(codes, vec![first.code, second.code]);

        let page = repo.history("whoever", 1, 10);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_items, 2);
    }

    #[test]
    fn test_order_by_unknown_code() {
        let repo = repo();
        let err = repo.order_by_code("ORD-NOPE0000").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn test_set_customer_and_custom_fields() {
        let mut repo = repo();
        let order = repo.set_customer(
            TOKEN,
            SetCustomerInput {
                email_address: "guest@example.com".to_string(),
                first_name: "Guest".to_string(),
                last_name: "Shopper".to_string(),
            },
        );
        assert!(order.customer.unwrap().id.starts_with("guest-"));

        let order = repo.set_custom_fields(
            TOKEN,
            BTreeMap::from([("giftMessage".to_string(), "Happy birthday".to_string())]),
        );
        assert_eq!(order.custom_fields["giftMessage"], "Happy birthday");
    }

    #[test]
    fn test_order_codes_are_unique() {
        let mut repo = repo();
        let codes: HashSet<String> = (0..50)
            .map(|i| repo.active_order(&format!("token-{i}")).code)
            .collect();
        assert_eq!(codes.len(), 50);
    }
}
