//! # Request Dispatch
//!
//! Maps one JSON request record to one command and shapes the envelope.
//!
//! ## Wire Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Line In, One Line Out                            │
//! │                                                                         │
//! │  stdin ──► {"op":"applyCouponCode","token":"Bearer t1","couponCode":"save10"}
//! │                 │                                                       │
//! │                 ├── "token" (or "authorization") ──► session            │
//! │                 ├── "op" + remaining fields ──► Request                 │
//! │                 ▼                                                       │
//! │            commands::order::apply_coupon_code(state, session, input)    │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │  stdout ◄── {"success":true,"data":{...order...}}                       │
//! │                                                                         │
//! │  Malformed JSON, unknown "op" or a field of the wrong type produce a   │
//! │  VALIDATION_ERROR envelope. The loop keeps going.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::commands::catalog::{SearchInput, VariantStockInput};
use crate::commands::customer::{
    AccountTokenInput, LoginInput, PasswordResetRequestInput, RegisterInput,
};
use crate::commands::order::{
    AddItemInput, AddressInput, CouponInput, CustomFieldsInput, CustomerInput, OrderLineInput,
    PaymentInput, ShippingMethodInput, TransitionInput,
};
use crate::commands::PageInput;
use crate::error::{ApiError, Envelope, ErrorCode};
use crate::state::AppState;

/// A request record, tagged by `op`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Request {
    // Catalog
    Search(SearchInput),
    GetProducts(PageInput),
    GetProduct {
        #[serde(default)]
        slug: Option<String>,
    },
    GetCollections,
    GetCollection {
        #[serde(default)]
        slug: Option<String>,
    },
    GetVariantStock(VariantStockInput),

    // Customers
    Login(LoginInput),
    Logout,
    RegisterCustomerAccount(RegisterInput),
    VerifyCustomerAccount(AccountTokenInput),
    RequestPasswordReset(PasswordResetRequestInput),
    ResetPassword(AccountTokenInput),
    GetActiveCustomer,
    GetAddresses,

    // Orders
    GetActiveOrder,
    GetOrderByCode {
        #[serde(default)]
        code: Option<String>,
    },
    GetOrderHistory(PageInput),
    AddItemToOrder(AddItemInput),
    RemoveOrderLine(OrderLineInput),
    AdjustOrderLine(OrderLineInput),
    ApplyCouponCode(CouponInput),
    RemoveCouponCode(CouponInput),
    SetOrderShippingAddress(AddressInput),
    SetOrderShippingMethod(ShippingMethodInput),
    SetCustomerForOrder(CustomerInput),
    SetOrderCustomFields(CustomFieldsInput),
    AddPaymentToOrder(PaymentInput),
    TransitionOrderToState(TransitionInput),

    // Settings
    GetShippingMethods,
    GetEligiblePaymentMethods,
    GetPaymentMethods,
    GetCountries,
    GetActiveChannel,
    CreatePaymentIntent,
}

/// Serializes an envelope, falling back to an internal error envelope.
fn respond<T: Serialize>(result: Result<T, ApiError>) -> Value {
    serde_json::to_value(Envelope::from(result)).unwrap_or_else(|e| {
        error!("Response serialization failed: {}", e);
        failure(ApiError::internal("Internal error"))
    })
}

fn failure(error: ApiError) -> Value {
    let code = error.code;
    serde_json::to_value(Envelope::<()>::failure(error)).unwrap_or_else(|_| {
        serde_json::json!({ "success": false, "errorCode": code, "message": "Internal error" })
    })
}

/// Runs one request against the store and returns its envelope.
pub fn dispatch(state: &AppState, session: Option<&str>, request: Request) -> Value {
    use crate::commands::{catalog, customer, order, settings};

    match request {
        Request::Search(input) => respond(catalog::search(state, input)),
        Request::GetProducts(page) => respond(Ok(catalog::get_products(state, page))),
        Request::GetProduct { slug } => respond(catalog::get_product(state, slug.as_deref())),
        Request::GetCollections => respond(Ok(catalog::get_collections(state))),
        Request::GetCollection { slug } => {
            respond(catalog::get_collection(state, slug.as_deref()))
        }
        Request::GetVariantStock(input) => respond(catalog::get_variant_stock(state, input)),

        Request::Login(input) => respond(customer::login(state, input)),
        Request::Logout => respond(Ok(customer::logout(state, session))),
        Request::RegisterCustomerAccount(input) => respond(customer::register(state, input)),
        Request::VerifyCustomerAccount(input) => respond(customer::verify_account(state, input)),
        Request::RequestPasswordReset(input) => {
            respond(customer::request_password_reset(state, input))
        }
        Request::ResetPassword(input) => respond(customer::reset_password(state, input)),
        Request::GetActiveCustomer => respond(Ok(customer::get_active_customer(state, session))),
        Request::GetAddresses => respond(Ok(customer::get_addresses(state, session))),

        Request::GetActiveOrder => respond(Ok(order::get_active_order(state, session))),
        Request::GetOrderByCode { code } => {
            respond(order::get_order_by_code(state, code.as_deref()))
        }
        Request::GetOrderHistory(page) => {
            respond(Ok(order::get_order_history(state, session, page)))
        }
        Request::AddItemToOrder(input) => respond(order::add_item_to_order(state, session, input)),
        Request::RemoveOrderLine(input) => respond(order::remove_order_line(state, session, input)),
        Request::AdjustOrderLine(input) => respond(order::adjust_order_line(state, session, input)),
        Request::ApplyCouponCode(input) => respond(order::apply_coupon_code(state, session, input)),
        Request::RemoveCouponCode(input) => {
            respond(order::remove_coupon_code(state, session, input))
        }
        Request::SetOrderShippingAddress(input) => {
            respond(order::set_order_shipping_address(state, session, input))
        }
        Request::SetOrderShippingMethod(input) => {
            respond(order::set_order_shipping_method(state, session, input))
        }
        Request::SetCustomerForOrder(input) => {
            respond(order::set_customer_for_order(state, session, input))
        }
        Request::SetOrderCustomFields(input) => {
            respond(Ok(order::set_order_custom_fields(state, session, input)))
        }
        Request::AddPaymentToOrder(input) => {
            respond(order::add_payment_to_order(state, session, input))
        }
        Request::TransitionOrderToState(input) => {
            respond(order::transition_order_to_state(state, session, input))
        }

        Request::GetShippingMethods => respond(Ok(settings::get_shipping_methods(state))),
        Request::GetEligiblePaymentMethods => {
            respond(Ok(settings::get_eligible_payment_methods(state)))
        }
        Request::GetPaymentMethods => respond(Ok(settings::get_payment_methods(state))),
        Request::GetCountries => respond(Ok(settings::get_countries(state))),
        Request::GetActiveChannel => respond(Ok(settings::get_active_channel(state))),
        Request::CreatePaymentIntent => respond(Ok(settings::create_payment_intent(state))),
    }
}

/// Parses one request line and dispatches it.
///
/// The session comes from `token`, or from `authorization` when `token` is
/// absent. Both accept a raw token or a `Bearer` value.
pub fn handle_line(state: &AppState, line: &str) -> Value {
    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Malformed request line");
            return failure(ApiError::validation(format!("Malformed request: {}", e)));
        }
    };

    if !value.is_object() {
        return failure(ApiError::validation("Request must be a JSON object"));
    }

    let session = value
        .get("token")
        .or_else(|| value.get("authorization"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let request: Request = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Invalid request");
            return failure(ApiError::new(
                ErrorCode::ValidationError,
                format!("Invalid request: {}", e),
            ));
        }
    };

    dispatch(state, session.as_deref(), request)
}

/// Serves requests line by line until the input ends.
///
/// Blank lines are skipped. Every other line gets exactly one response line.
pub fn serve<R, W>(state: &AppState, input: R, mut output: W) -> std::io::Result<usize>
where
    R: BufRead,
    W: Write,
{
    let mut handled = 0;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(state, &line);
        writeln!(output, "{}", response)?;
        output.flush()?;
        handled += 1;
    }

    debug!(handled, "Input closed");
    Ok(handled)
}

// =============================================================================
// Unit Tests
// =============================================================================
