//! # Order Aggregate
//!
//! The `Order` record and every rule that mutates it: line merging, quantity
//! adjustment, coupons, shipping, payments, state transitions and totals.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  add_item ─────┐                                                        │
//! │  remove_line ──┤                                                        │
//! │  adjust_line ──┤        ┌──────────────────────────────────────────┐   │
//! │  apply_coupon ─┼──────► │ Totals::compute() (overflow-checked)     │   │
//! │  remove_coupon ┤        │   total_quantity = Σ quantity             │   │
//! │  set_shipping_*┘        │   sub_total      = Σ line_price_with_tax  │   │
//! │                         │   total_with_tax = sub_total              │   │
//! │                         │                  + shipping_with_tax      │   │
//! │                         │                  − Σ discounts            │   │
//! │                         └──────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Failing mutations return before touching the order.                    │
//! │  Exception: add_payment records the payment attempt first.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! The aggregate knows nothing about sessions. Which order is "active" for a
//! token, and retiring it after payment, is the order repository's job.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::order_state::OrderState;
use crate::pricing::{
    coupon_discount, normalize_coupon_code, shipping_rate_for_country,
    COUPON_DESCRIPTION_PREFIX,
};
use crate::types::{Asset, ShippingMethod};
use crate::validation::{validate_price, validate_quantity, validate_quantity_bound};

// =============================================================================
// Input Records
// =============================================================================

/// What the caller knows about a variant when adding it to the cart.
///
/// Copied onto the line at creation time; later catalog changes do not
/// reach existing lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VariantInfo {
    pub name: String,
    pub sku: String,
    pub price: Money,
    #[serde(default)]
    pub asset: Option<Asset>,
}

impl VariantInfo {
    pub fn new(name: impl Into<String>, sku: impl Into<String>, price: Money) -> Self {
        VariantInfo {
            name: name.into(),
            sku: sku.into(),
            price,
            asset: None,
        }
    }

    pub fn with_asset(mut self, asset: Asset) -> Self {
        self.asset = Some(asset);
        self
    }
}

/// Input for `setShippingAddress`. No field is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShippingAddressInput {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub street_line1: String,
    #[serde(default)]
    pub street_line2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country_code: String,
}

/// Gateway simulation flags carried with a payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct PaymentMetadata {
    pub should_decline: bool,
    pub should_error: bool,
}

/// Input for `addPayment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddPaymentInput {
    pub method: String,
    #[serde(default)]
    pub metadata: PaymentMetadata,
}

impl AddPaymentInput {
    pub fn new(method: impl Into<String>) -> Self {
        AddPaymentInput {
            method: method.into(),
            metadata: PaymentMetadata::default(),
        }
    }
}

/// Input for attaching a guest customer to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SetCustomerInput {
    pub email_address: String,
    pub first_name: String,
    pub last_name: String,
}

// =============================================================================
// Order Parts
// =============================================================================

/// Variant reference frozen onto an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VariantRef {
    pub id: String,
    pub name: String,
    pub sku: String,
}

/// One line of an order.
///
/// `line_price_with_tax` is always `unit_price_with_tax × quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLine {
    pub id: String,
    pub unit_price_with_tax: Money,
    pub quantity: i64,
    pub line_price_with_tax: Money,
    pub product_variant: VariantRef,
    pub featured_asset: Option<Asset>,
}

impl OrderLine {
    fn set_quantity(&mut self, quantity: i64) -> CoreResult<()> {
        self.line_price_with_tax = line_price(self.unit_price_with_tax, quantity)?;
        self.quantity = quantity;
        Ok(())
    }
}

fn line_price(unit_price: Money, quantity: i64) -> CoreResult<Money> {
    unit_price
        .multiply_quantity(quantity)
        .ok_or_else(|| too_large("linePriceWithTax"))
}

fn too_large(field: &str) -> CoreError {
    ValidationError::TooLarge {
        field: field.to_string(),
        max: i64::MAX,
    }
    .into()
}

/// A discount applied to the order, one per coupon code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Discount {
    pub description: String,
    pub amount_with_tax: Money,
    /// The coupon that produced this discount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

/// Shipping address as stored on the order. `country` is the ISO code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderAddress {
    pub full_name: Option<String>,
    pub street_line1: Option<String>,
    pub street_line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl From<ShippingAddressInput> for OrderAddress {
    fn from(input: ShippingAddressInput) -> Self {
        OrderAddress {
            full_name: input.full_name,
            street_line1: Some(input.street_line1),
            street_line2: input.street_line2,
            city: input.city,
            postal_code: input.postal_code,
            country: Some(input.country_code),
        }
    }
}

/// Customer attached to an order (guest or account holder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderCustomer {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
}

/// A recorded payment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderPayment {
    pub method: String,
}

/// Shipping method reference on a shipping line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShippingLineMethod {
    pub id: String,
    pub name: String,
}

/// The selected shipping method. An order has at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShippingLine {
    pub shipping_method: ShippingLineMethod,
}

// =============================================================================
// Order
// =============================================================================

/// A shopping cart that becomes a placed order.
///
/// ## Totals Invariant
/// The four total fields are a pure function of `lines`, `discounts` and
/// `shipping_with_tax`. They are only ever written from [`Totals::compute`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    /// Opaque identifier (UUID v4).
    pub id: String,

    /// Human-readable code (`ORD-XXXXXXXX`).
    pub code: String,

    pub state: OrderState,

    /// Upper-cased coupon codes, in the order they were applied.
    pub coupon_codes: Vec<String>,

    pub total_quantity: i64,
    pub sub_total: Money,
    pub shipping_with_tax: Money,
    pub total_with_tax: Money,

    pub currency_code: String,

    /// Stamped every time the order enters `PaymentSettled`.
    #[ts(as = "Option<String>")]
    pub order_placed_at: Option<DateTime<Utc>>,

    pub customer: Option<OrderCustomer>,
    pub shipping_address: Option<OrderAddress>,
    pub discounts: Vec<Discount>,
    pub lines: Vec<OrderLine>,
    pub payments: Vec<OrderPayment>,
    pub shipping_lines: Vec<ShippingLine>,
    pub custom_fields: BTreeMap<String, String>,
}

impl Order {
    /// Creates an empty order in `AddingItems`.
    pub fn new(code: impl Into<String>, currency_code: impl Into<String>) -> Self {
        Order {
            id: Uuid::new_v4().to_string(),
            code: code.into(),
            state: OrderState::AddingItems,
            coupon_codes: Vec::new(),
            total_quantity: 0,
            sub_total: Money::zero(),
            shipping_with_tax: Money::zero(),
            total_with_tax: Money::zero(),
            currency_code: currency_code.into(),
            order_placed_at: None,
            customer: None,
            shipping_address: None,
            discounts: Vec::new(),
            lines: Vec::new(),
            payments: Vec::new(),
            shipping_lines: Vec::new(),
            custom_fields: BTreeMap::new(),
        }
    }

    /// Generates an order code of the form `ORD-XXXXXXXX`.
    pub fn generate_code() -> String {
        let hex = Uuid::new_v4().simple().to_string().to_uppercase();
        format!("ORD-{}", &hex[..8])
    }

    /// An untouched cart: no lines and still `AddingItems`.
    pub fn is_empty_cart(&self) -> bool {
        self.lines.is_empty() && self.state == OrderState::AddingItems
    }

    // -------------------------------------------------------------------------
    // Lines
    // -------------------------------------------------------------------------

    /// Adds `quantity` of a variant.
    ///
    /// ## Merge Rule
    /// ```text
    /// variant already on a line?
    ///   yes ──► quantity += n, price recomputed from the line's unit price
    ///           (info.price is ignored)
    ///   no  ──► append a new line at info.price
    /// ```
    ///
    /// ## Errors
    /// Validation error for a quantity outside `1..=MAX_LINE_QUANTITY` (also
    /// after merging), a price outside `0..=MAX_UNIT_PRICE`, or totals that
    /// would overflow. The order is unchanged on error.
    pub fn add_item(
        &mut self,
        variant_id: &str,
        quantity: i64,
        info: &VariantInfo,
    ) -> CoreResult<&OrderLine> {
        validate_quantity(quantity)?;
        validate_price(info.price)?;

        let mut lines = self.lines.clone();
        let index = match lines
            .iter()
            .position(|line| line.product_variant.id == variant_id)
        {
            Some(index) => {
                let line = &mut lines[index];
                let merged = validate_quantity_bound(line.quantity.saturating_add(quantity))?;
                line.set_quantity(merged)?;
                index
            }
            None => {
                lines.push(OrderLine {
                    id: Uuid::new_v4().to_string(),
                    unit_price_with_tax: info.price,
                    quantity,
                    line_price_with_tax: line_price(info.price, quantity)?,
                    product_variant: VariantRef {
                        id: variant_id.to_string(),
                        name: info.name.clone(),
                        sku: info.sku.clone(),
                    },
                    featured_asset: info.asset.clone(),
                });
                lines.len() - 1
            }
        };

        let totals = Totals::compute(&lines, &self.discounts, self.shipping_with_tax)?;
        self.lines = lines;
        self.apply_totals(totals);
        Ok(&self.lines[index])
    }

    /// Deletes a line.
    pub fn remove_line(&mut self, line_id: &str) -> CoreResult<()> {
        let index = self.line_index(line_id)?;

        let mut lines = self.lines.clone();
        lines.remove(index);

        let totals = Totals::compute(&lines, &self.discounts, self.shipping_with_tax)?;
        self.lines = lines;
        self.apply_totals(totals);
        Ok(())
    }

    /// Sets a line's quantity. Zero or less deletes the line.
    ///
    /// ## Errors
    /// - `OrderLineNotFound` for an unknown line
    /// - Validation error above `MAX_LINE_QUANTITY` or on total overflow
    pub fn adjust_line(&mut self, line_id: &str, quantity: i64) -> CoreResult<()> {
        let index = self.line_index(line_id)?;

        if quantity <= 0 {
            return self.remove_line(line_id);
        }
        validate_quantity_bound(quantity)?;

        let mut lines = self.lines.clone();
        lines[index].set_quantity(quantity)?;

        let totals = Totals::compute(&lines, &self.discounts, self.shipping_with_tax)?;
        self.lines = lines;
        self.apply_totals(totals);
        Ok(())
    }

    fn line_index(&self, line_id: &str) -> CoreResult<usize> {
        self.lines
            .iter()
            .position(|line| line.id == line_id)
            .ok_or_else(|| CoreError::OrderLineNotFound {
                line_id: line_id.to_string(),
            })
    }

    // -------------------------------------------------------------------------
    // Coupons
    // -------------------------------------------------------------------------

    /// Applies a coupon code (case-insensitive).
    ///
    /// ## Errors
    /// - `CouponCodeInvalid` if the code is not in the coupon table
    /// - `CouponCodeAlreadyApplied` if the code is already on the order
    pub fn apply_coupon(&mut self, code: &str) -> CoreResult<()> {
        let normalized = normalize_coupon_code(code);

        let amount = coupon_discount(&normalized).ok_or_else(|| CoreError::CouponCodeInvalid {
            code: normalized.clone(),
        })?;

        if self.coupon_codes.contains(&normalized) {
            return Err(CoreError::CouponCodeAlreadyApplied { code: normalized });
        }

        let mut discounts = self.discounts.clone();
        discounts.push(Discount {
            description: format!("{COUPON_DESCRIPTION_PREFIX}{normalized}"),
            amount_with_tax: amount,
            coupon_code: Some(normalized.clone()),
        });

        let totals = Totals::compute(&self.lines, &discounts, self.shipping_with_tax)?;
        self.discounts = discounts;
        self.coupon_codes.push(normalized);
        self.apply_totals(totals);
        Ok(())
    }

    /// Removes a coupon code. Returns whether anything was removed.
    pub fn remove_coupon(&mut self, code: &str) -> CoreResult<bool> {
        let normalized = normalize_coupon_code(code);

        let Some(index) = self.coupon_codes.iter().position(|c| *c == normalized) else {
            return Ok(false);
        };

        let mut discounts = self.discounts.clone();
        discounts.retain(|d| d.coupon_code.as_deref() != Some(normalized.as_str()));

        let totals = Totals::compute(&self.lines, &discounts, self.shipping_with_tax)?;
        self.coupon_codes.remove(index);
        self.discounts = discounts;
        self.apply_totals(totals);
        Ok(true)
    }

    // -------------------------------------------------------------------------
    // Shipping
    // -------------------------------------------------------------------------

    /// Stores the shipping address.
    ///
    /// The country's flat rate becomes the shipping charge only while no
    /// shipping method is selected; a chosen method keeps its price.
    pub fn set_shipping_address(&mut self, input: ShippingAddressInput) -> CoreResult<()> {
        let shipping = if self.shipping_lines.is_empty() {
            shipping_rate_for_country(&input.country_code)
        } else {
            self.shipping_with_tax
        };

        let totals = Totals::compute(&self.lines, &self.discounts, shipping)?;
        self.shipping_with_tax = shipping;
        self.shipping_address = Some(input.into());
        self.apply_totals(totals);
        Ok(())
    }

    /// Selects a shipping method, replacing any previous selection.
    pub fn set_shipping_method(&mut self, method: &ShippingMethod) -> CoreResult<()> {
        let totals = Totals::compute(&self.lines, &self.discounts, method.price)?;
        self.shipping_with_tax = method.price;
        self.shipping_lines = vec![ShippingLine {
            shipping_method: ShippingLineMethod {
                id: method.id.clone(),
                name: method.name.clone(),
            },
        }];
        self.apply_totals(totals);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Customer & Custom Fields
    // -------------------------------------------------------------------------

    /// Attaches a guest customer with a freshly generated `guest-` id.
    pub fn set_customer(&mut self, input: SetCustomerInput) -> &OrderCustomer {
        self.customer.insert(OrderCustomer {
            id: format!("guest-{}", Uuid::new_v4()),
            first_name: input.first_name,
            last_name: input.last_name,
            email_address: input.email_address,
        })
    }

    /// Merges custom fields into the order. Totals are unaffected.
    pub fn set_custom_fields(&mut self, fields: BTreeMap<String, String>) {
        self.custom_fields.extend(fields);
    }

    // -------------------------------------------------------------------------
    // Payment & State
    // -------------------------------------------------------------------------

    /// Records a payment attempt and settles the order if the gateway accepts.
    ///
    /// ## When This Occurs
    /// ```text
    /// payments.push(method)          ◄── always, even if the attempt fails
    ///      │
    ///      ├── should_decline ──► Err(PaymentDeclined)
    ///      ├── should_error   ──► Err(PaymentFailed)
    ///      └── otherwise      ──► state = PaymentSettled, order_placed_at = now
    /// ```
    ///
    /// Settling ignores the transition table.
    pub fn add_payment(&mut self, input: AddPaymentInput) -> CoreResult<()> {
        self.payments.push(OrderPayment {
            method: input.method,
        });

        if input.metadata.should_decline {
            return Err(CoreError::PaymentDeclined);
        }
        if input.metadata.should_error {
            return Err(CoreError::PaymentFailed);
        }

        self.settle();
        Ok(())
    }

    /// Moves to the named state if the transition table allows it.
    pub fn transition(&mut self, target: &str) -> CoreResult<OrderState> {
        let next = self.state.transition(target)?;

        if next == OrderState::PaymentSettled {
            self.settle();
        } else {
            self.state = next;
        }
        Ok(next)
    }

    fn settle(&mut self) {
        self.state = OrderState::PaymentSettled;
        self.order_placed_at = Some(Utc::now());
    }

    // -------------------------------------------------------------------------
    // Totals
    // -------------------------------------------------------------------------

    /// Writes totals computed by [`Totals::compute`].
    fn apply_totals(&mut self, totals: Totals) {
        self.total_quantity = totals.total_quantity;
        self.sub_total = totals.sub_total;
        self.total_with_tax = totals.total_with_tax;
    }
}

/// Derived order totals, computed with overflow checks.
///
/// Mutations compute these for the would-be order first and only write
/// anything once they fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub total_quantity: i64,
    pub sub_total: Money,
    pub total_with_tax: Money,
}

impl Totals {
    /// `total_with_tax = Σ line_price_with_tax + shipping − Σ discounts`.
    ///
    /// ## Errors
    /// Validation error naming the first total that overflows.
    pub fn compute(lines: &[OrderLine], discounts: &[Discount], shipping: Money) -> CoreResult<Self> {
        let total_quantity = lines
            .iter()
            .try_fold(0i64, |sum, line| sum.checked_add(line.quantity))
            .ok_or_else(|| too_large("totalQuantity"))?;
        let sub_total = Money::checked_sum(lines.iter().map(|line| line.line_price_with_tax))
            .ok_or_else(|| too_large("subTotal"))?;
        let discount_total = Money::checked_sum(discounts.iter().map(|d| d.amount_with_tax))
            .ok_or_else(|| too_large("discounts"))?;
        let total_with_tax = sub_total
            .checked_add(shipping)
            .and_then(|total| total.checked_sub(discount_total))
            .ok_or_else(|| too_large("totalWithTax"))?;

        Ok(Totals {
            total_quantity,
            sub_total,
            total_with_tax,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{MAX_LINE_QUANTITY, MAX_UNIT_PRICE};
    use proptest::prelude::*;

    fn iphone() -> VariantInfo {
        VariantInfo::new(
            "iPhone 15 Pro 128GB Natural Titanium",
            "IP15P-128-NT",
            Money::from_minor(99900),
        )
    }

    fn tshirt() -> VariantInfo {
        VariantInfo::new("Classic Cotton T-Shirt S White", "TSHIRT-S-WH", Money::from_minor(2900))
    }

    fn express() -> ShippingMethod {
        ShippingMethod {
            id: "ship-2".to_string(),
            name: "Express Shipping".to_string(),
            price: Money::from_minor(1999),
            description: "Delivery in 2-3 business days".to_string(),
        }
    }

    fn us_address() -> ShippingAddressInput {
        ShippingAddressInput {
            full_name: Some("John Doe".to_string()),
            street_line1: "123 Main Street".to_string(),
            country_code: "US".to_string(),
            ..Default::default()
        }
    }

    fn new_order() -> Order {
        Order::new(Order::generate_code(), "USD")
    }

    fn assert_totals_consistent(order: &Order) {
        let sub_total: Money = order.lines.iter().map(|l| l.line_price_with_tax).sum();
        let discounts: Money = order.discounts.iter().map(|d| d.amount_with_tax).sum();
        let quantity: i64 = order.lines.iter().map(|l| l.quantity).sum();

        assert_eq!(order.sub_total, sub_total);
        assert_eq!(order.total_quantity, quantity);
        assert_eq!(order.total_with_tax, sub_total + order.shipping_with_tax - discounts);
        for line in &order.lines {
            assert_eq!(
                Some(line.line_price_with_tax),
                line.unit_price_with_tax.multiply_quantity(line.quantity)
            );
        }
    }

    #[test]
    fn test_new_order_is_empty_cart() {
        let order = new_order();
        assert!(order.is_empty_cart());
        assert_eq!(order.total_with_tax, Money::zero());
        assert!(order.code.starts_with("ORD-"));
        assert_eq!(order.code.len(), 12);
        assert!(order.order_placed_at.is_none());
    }

    #[test]
    fn test_guest_cart_with_coupon() {
        let mut order = new_order();

        order.add_item("var-1-1", 1, &iphone()).unwrap();
        assert_eq!(order.sub_total.minor(), 99900);

        order.add_item("var-1-1", 2, &iphone()).unwrap();
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].quantity, 3);
        assert_eq!(order.lines[0].line_price_with_tax.minor(), 299700);

        order.apply_coupon("SAVE10").unwrap();
        assert_eq!(order.total_with_tax.minor(), 298700);
        assert_totals_consistent(&order);
    }

    #[test]
    fn test_merge_keeps_original_unit_price() {
        let mut order = new_order();
        order.add_item("var-1-1", 1, &iphone()).unwrap();

        let cheaper = VariantInfo::new("whatever", "X", Money::from_minor(1));
        let line = order.add_item("var-1-1", 1, &cheaper).unwrap();

        assert_eq!(line.unit_price_with_tax.minor(), 99900);
        assert_eq!(line.product_variant.name, "iPhone 15 Pro 128GB Natural Titanium");
        assert_eq!(order.sub_total.minor(), 199800);
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut order = new_order();
        order.add_item("var-5-1", 2, &tshirt()).unwrap();
        order.add_item("var-1-1", 1, &iphone()).unwrap();
        order.add_item("var-5-1", 1, &tshirt()).unwrap();

        let ids: Vec<_> = order.lines.iter().map(|l| l.product_variant.id.as_str()).collect();
        assert_eq!(ids, vec!["var-5-1", "var-1-1"]);
        assert_eq!(order.total_quantity, 4);
    }

    #[test]
    fn test_line_copies_asset() {
        let mut order = new_order();
        let info = iphone().with_asset(Asset::new("asset-var-1-1", "https://example.test/a.jpg"));
        let line = order.add_item("var-1-1", 1, &info).unwrap();
        assert_eq!(line.featured_asset.as_ref().map(|a| a.id.as_str()), Some("asset-var-1-1"));
    }

    #[test]
    fn test_remove_unknown_line() {
        let mut order = new_order();
        order.add_item("var-1-1", 1, &iphone()).unwrap();
        let before = order.clone();

        let err = order.remove_line("nope").unwrap_err();
        assert_eq!(err.code(), "ORDER_LINE_NOT_FOUND");
        assert_eq!(order, before);
    }

    #[test]
    fn test_adjust_to_zero_equals_remove() {
        let mut adjusted = new_order();
        adjusted.add_item("var-1-1", 1, &iphone()).unwrap();
        adjusted.add_item("var-5-1", 3, &tshirt()).unwrap();
        let mut removed = adjusted.clone();

        let line_id = adjusted.lines[0].id.clone();
        adjusted.adjust_line(&line_id, 0).unwrap();
        removed.remove_line(&line_id).unwrap();

        assert_eq!(adjusted, removed);
        assert_eq!(adjusted.lines.len(), 1);
        assert_eq!(adjusted.sub_total.minor(), 8700);
    }

    #[test]
    fn test_adjust_negative_removes_line() {
        let mut order = new_order();
        order.add_item("var-1-1", 2, &iphone()).unwrap();
        let line_id = order.lines[0].id.clone();

        order.adjust_line(&line_id, -5).unwrap();
        assert!(order.lines.is_empty());
        assert_eq!(order.sub_total, Money::zero());
    }

    #[test]
    fn test_adjust_unknown_line() {
        let mut order = new_order();
        assert!(matches!(
            order.adjust_line("missing", 0),
            Err(CoreError::OrderLineNotFound { .. })
        ));
    }

    #[test]
    fn test_adjust_sets_quantity() {
        let mut order = new_order();
        order.add_item("var-5-1", 1, &tshirt()).unwrap();
        let line_id = order.lines[0].id.clone();

        order.adjust_line(&line_id, 4).unwrap();
        assert_eq!(order.lines[0].quantity, 4);
        assert_eq!(order.lines[0].line_price_with_tax.minor(), 11600);
        assert_totals_consistent(&order);
    }

    #[test]
    fn test_coupon_applied_twice() {
        let mut order = new_order();
        order.add_item("var-1-1", 1, &iphone()).unwrap();

        order.apply_coupon("save20").unwrap();
        let err = order.apply_coupon("SAVE20").unwrap_err();

        assert_eq!(err.code(), "COUPON_CODE_ALREADY_APPLIED_ERROR");
        assert_eq!(order.coupon_codes, vec!["SAVE20".to_string()]);
        assert_eq!(order.discounts.len(), 1);
        assert_eq!(order.discounts[0].description, "Coupon: SAVE20");
        assert_eq!(order.total_with_tax.minor(), 97900);
    }

    #[test]
    fn test_invalid_coupon_leaves_order_alone() {
        let mut order = new_order();
        order.add_item("var-1-1", 1, &iphone()).unwrap();
        let before = order.clone();

        let err = order.apply_coupon("FREESTUFF").unwrap_err();
        assert_eq!(err.code(), "COUPON_CODE_INVALID_ERROR");
        assert_eq!(order, before);
    }

    #[test]
    fn test_remove_coupon() {
        let mut order = new_order();
        order.add_item("var-5-1", 1, &tshirt()).unwrap();
        order.apply_coupon("WELCOME").unwrap();
        order.apply_coupon("SAVE10").unwrap();
        assert_eq!(order.total_with_tax.minor(), 2900 - 1500);

        assert!(order.remove_coupon("welcome").unwrap());
        assert_eq!(order.coupon_codes, vec!["SAVE10".to_string()]);
        assert_eq!(order.discounts.len(), 1);
        assert_eq!(order.total_with_tax.minor(), 1900);

        assert!(!order.remove_coupon("WELCOME").unwrap());
        assert_eq!(order.total_with_tax.minor(), 1900);
    }

    #[test]
    fn test_discount_may_exceed_subtotal() {
        let mut order = new_order();
        order.add_item("var-5-1", 1, &tshirt()).unwrap();
        order.apply_coupon("SAVE20").unwrap();
        order.apply_coupon("SAVE10").unwrap();
        assert_eq!(order.total_with_tax.minor(), 2900 - 3000);
    }

    #[test]
    fn test_shipping_address_sets_country_rate() {
        let mut order = new_order();
        order.add_item("var-5-1", 1, &tshirt()).unwrap();

        order.set_shipping_address(ShippingAddressInput {
            country_code: "CA".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(order.shipping_with_tax.minor(), 1499);
        assert_eq!(order.total_with_tax.minor(), 2900 + 1499);

        order.set_shipping_address(ShippingAddressInput {
            country_code: "FR".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(order.shipping_with_tax.minor(), 2499);
        assert_eq!(
            order.shipping_address.as_ref().and_then(|a| a.country.as_deref()),
            Some("FR")
        );
    }

    #[test]
    fn test_shipping_method_survives_address_update() {
        let mut order = new_order();
        order.set_shipping_method(&express()).unwrap();
        order.set_shipping_address(us_address()).unwrap();

        assert_eq!(order.shipping_with_tax.minor(), 1999);
        assert_eq!(order.shipping_lines.len(), 1);
        assert_eq!(order.shipping_lines[0].shipping_method.name, "Express Shipping");
    }

    #[test]
    fn test_shipping_method_overrides_address_rate() {
        let mut order = new_order();
        order.set_shipping_address(us_address()).unwrap();
        assert_eq!(order.shipping_with_tax.minor(), 999);

        order.set_shipping_method(&express()).unwrap();
        order.set_shipping_method(&express()).unwrap();
        assert_eq!(order.shipping_with_tax.minor(), 1999);
        assert_eq!(order.shipping_lines.len(), 1);
    }

    #[test]
    fn test_payment_settles_order() {
        let mut order = new_order();
        order.add_item("var-1-1", 1, &iphone()).unwrap();

        order.add_payment(AddPaymentInput::new("credit-card")).unwrap();
        assert_eq!(order.state, OrderState::PaymentSettled);
        assert!(order.order_placed_at.is_some());
        assert_eq!(order.payments.len(), 1);
    }

    #[test]
    fn test_declined_payment_is_still_recorded() {
        let mut order = new_order();
        let input = AddPaymentInput {
            method: "paypal".to_string(),
            metadata: PaymentMetadata {
                should_decline: true,
                should_error: true,
            },
        };

        let err = order.add_payment(input).unwrap_err();
        assert_eq!(err, CoreError::PaymentDeclined);
        assert_eq!(order.payments.len(), 1);
        assert_eq!(order.state, OrderState::AddingItems);
        assert!(order.order_placed_at.is_none());
    }

    #[test]
    fn test_failed_payment() {
        let mut order = new_order();
        let input = AddPaymentInput {
            method: "stripe".to_string(),
            metadata: PaymentMetadata {
                should_decline: false,
                should_error: true,
            },
        };
        assert_eq!(order.add_payment(input), Err(CoreError::PaymentFailed));
        assert_eq!(order.payments[0].method, "stripe");
    }

    #[test]
    fn test_transition_path_to_delivered() {
        let mut order = new_order();
        order.transition("ArrangingPayment").unwrap();
        order.transition("PaymentSettled").unwrap();
        let placed = order.order_placed_at;
        assert!(placed.is_some());

        order.transition("Shipped").unwrap();
        order.transition("Delivered").unwrap();
        assert_eq!(order.order_placed_at, placed);

        let before = order.clone();
        let err = order.transition("Cancelled").unwrap_err();
        assert_eq!(err.to_string(), "Cannot transition from Delivered to Cancelled");
        assert_eq!(order, before);
    }

    #[test]
    fn test_set_customer_generates_guest_id() {
        let mut order = new_order();
        let customer = order.set_customer(SetCustomerInput {
            email_address: "guest@example.com".to_string(),
            first_name: "Guest".to_string(),
            last_name: "Shopper".to_string(),
        });
        assert!(customer.id.starts_with("guest-"));
        assert_eq!(customer.email_address, "guest@example.com");
    }

    #[test]
    fn test_custom_fields_merge_without_touching_totals() {
        let mut order = new_order();
        order.add_item("var-5-1", 1, &tshirt()).unwrap();
        let total = order.total_with_tax;

        order.set_custom_fields(BTreeMap::from([("giftWrap".to_string(), "yes".to_string())]));
        order.set_custom_fields(BTreeMap::from([("note".to_string(), "leave at door".to_string())]));

        assert_eq!(order.custom_fields.len(), 2);
        assert_eq!(order.total_with_tax, total);
    }

    #[test]
    fn test_order_wire_shape() {
        let mut order = new_order();
        order.add_item("var-1-1", 1, &iphone()).unwrap();
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["state"], "AddingItems");
        assert_eq!(json["subTotal"], 99900);
        assert_eq!(json["lines"][0]["productVariant"]["sku"], "IP15P-128-NT");
        assert_eq!(json["lines"][0]["linePriceWithTax"], 99900);
        assert!(json["orderPlacedAt"].is_null());
    }

    #[test]
    fn test_huge_quantity_is_rejected_without_mutation() {
        let mut order = new_order();
        order.add_item("var-5-1", 1, &tshirt()).unwrap();
        let before = order.clone();

        for quantity in [MAX_LINE_QUANTITY + 1, 9_223_372_036_854_775, i64::MAX] {
            let err = order.add_item("var-1-1", quantity, &iphone()).unwrap_err();
            assert_eq!(err.code(), "VALIDATION_ERROR");
            assert_eq!(order, before);
        }
    }

    #[test]
    fn test_merge_past_the_quantity_bound() {
        let mut order = new_order();
        order.add_item("var-1-1", MAX_LINE_QUANTITY, &iphone()).unwrap();
        assert_eq!(order.sub_total.minor(), 99900 * MAX_LINE_QUANTITY);
        let before = order.clone();

        let err = order.add_item("var-1-1", 1, &iphone()).unwrap_err();
        assert_eq!(
            err,
            CoreError::Validation(ValidationError::TooLarge {
                field: "quantity".to_string(),
                max: MAX_LINE_QUANTITY,
            })
        );
        assert_eq!(order, before);
    }

    #[test]
    fn test_adjust_past_the_quantity_bound() {
        let mut order = new_order();
        order.add_item("var-1-1", 1, &iphone()).unwrap();
        let line_id = order.lines[0].id.clone();
        let before = order.clone();

        for quantity in [MAX_LINE_QUANTITY + 1, i64::MAX] {
            let err = order.adjust_line(&line_id, quantity).unwrap_err();
            assert_eq!(err.code(), "VALIDATION_ERROR");
            assert_eq!(order, before);
        }

        order.adjust_line(&line_id, MAX_LINE_QUANTITY).unwrap();
        assert_eq!(order.total_quantity, MAX_LINE_QUANTITY);
        assert_totals_consistent(&order);

        order.adjust_line(&line_id, i64::MIN).unwrap();
        assert!(order.lines.is_empty());
    }

    #[test]
    fn test_price_bound() {
        let mut order = new_order();
        let negative = VariantInfo::new("Refund?", "NEG", Money::from_minor(-1));
        let huge = VariantInfo::new("Yacht", "YACHT", Money::from_minor(i64::MAX));

        assert_eq!(order.add_item("var-x", 1, &negative).unwrap_err().code(), "VALIDATION_ERROR");
        assert_eq!(order.add_item("var-y", 1, &huge).unwrap_err().code(), "VALIDATION_ERROR");
        assert!(order.lines.is_empty());

        let priciest = VariantInfo::new("Jet", "JET", MAX_UNIT_PRICE);
        order.add_item("var-z", MAX_LINE_QUANTITY, &priciest).unwrap();
        assert_eq!(
            order.total_with_tax.minor(),
            MAX_UNIT_PRICE.minor() * MAX_LINE_QUANTITY
        );
    }

    #[test]
    fn test_totals_overflow_is_an_error() {
        let line = |price: i64| OrderLine {
            id: "line".to_string(),
            unit_price_with_tax: Money::from_minor(price),
            quantity: 1,
            line_price_with_tax: Money::from_minor(price),
            product_variant: VariantRef {
                id: "v".to_string(),
                name: "v".to_string(),
                sku: "v".to_string(),
            },
            featured_asset: None,
        };

        let lines = vec![line(i64::MAX), line(1)];
        let err = Totals::compute(&lines, &[], Money::zero()).unwrap_err();
        assert_eq!(err.to_string(), format!("Validation error: subTotal must be at most {}", i64::MAX));

        let lines = vec![line(i64::MAX)];
        assert!(Totals::compute(&lines, &[], Money::from_minor(1)).is_err());

        let totals = Totals::compute(&[line(500)], &[], Money::from_minor(999)).unwrap();
        assert_eq!(totals.total_with_tax.minor(), 1499);
        assert_eq!(totals.total_quantity, 1);
    }

    // -------------------------------------------------------------------------
    // Totals invariant over random mutation sequences
    // -------------------------------------------------------------------------

    #[derive(Debug, Clone)]
    enum LineOp {
        Add { variant: usize, quantity: i64 },
        Remove { line: usize },
        Adjust { line: usize, quantity: i64 },
        Coupon { code: usize },
        Ship { country: usize },
    }

    const VARIANTS: [(&str, i64); 4] = [
        ("var-1-1", 99900),
        ("var-3-1", 24900),
        ("var-5-1", 2900),
        ("var-6-1", 4900),
    ];
    const CODES: [&str; 4] = ["SAVE10", "save20", "WELCOME", "BOGUS"];
    const COUNTRIES: [&str; 4] = ["US", "CA", "GB", "JP"];

    /// Mostly everyday quantities, sometimes the extremes.
    fn quantity() -> impl Strategy<Value = i64> {
        prop_oneof![
            8 => -2i64..10,
            1 => Just(MAX_LINE_QUANTITY),
            1 => Just(MAX_LINE_QUANTITY + 1),
            1 => Just(9_223_372_036_854_775),
            1 => Just(i64::MAX),
            1 => Just(i64::MIN),
        ]
    }

    fn line_op() -> impl Strategy<Value = LineOp> {
        prop_oneof![
            (0..VARIANTS.len(), quantity()).prop_map(|(variant, quantity)| LineOp::Add { variant, quantity }),
            (0usize..6).prop_map(|line| LineOp::Remove { line }),
            (0usize..6, quantity()).prop_map(|(line, quantity)| LineOp::Adjust { line, quantity }),
            (0..CODES.len()).prop_map(|code| LineOp::Coupon { code }),
            (0..COUNTRIES.len()).prop_map(|country| LineOp::Ship { country }),
        ]
    }

    proptest! {
        #[test]
        fn test_totals_hold_after_any_mutation_sequence(ops in proptest::collection::vec(line_op(), 0..40)) {
            let mut order = new_order();

            for op in ops {
                match op {
                    LineOp::Add { variant, quantity } => {
                        let (id, price) = VARIANTS[variant];
                        let info = VariantInfo::new(id, id, Money::from_minor(price));
                        let _ = order.add_item(id, quantity, &info);
                    }
                    LineOp::Remove { line } => {
                        let id = order.lines.get(line).map(|l| l.id.clone()).unwrap_or_default();
                        let _ = order.remove_line(&id);
                    }
                    LineOp::Adjust { line, quantity } => {
                        let id = order.lines.get(line).map(|l| l.id.clone()).unwrap_or_default();
                        let _ = order.adjust_line(&id, quantity);
                    }
                    LineOp::Coupon { code } => {
                        let _ = order.apply_coupon(CODES[code]);
                    }
                    LineOp::Ship { country } => {
                        order.set_shipping_address(ShippingAddressInput {
                            country_code: COUNTRIES[country].to_string(),
                            ..Default::default()
                        })
                        .unwrap();
                    }
                }

                assert_totals_consistent(&order);
                prop_assert!(order.lines.iter().all(|l| (1..=MAX_LINE_QUANTITY).contains(&l.quantity)));
            }
        }
    }
}
