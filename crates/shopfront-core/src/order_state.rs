//! # Order State Machine
//!
//! The lifecycle of an order, from cart to delivery.
//!
//! ## Transition Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  AddingItems ──► ArrangingPayment ──┬──► PaymentAuthorized ──┐         │
//! │                                     │          │             │         │
//! │                                     │          ▼             ▼         │
//! │                                     └──► PaymentSettled   Cancelled    │
//! │                                                │   │          ▲        │
//! │                                                │   └──────────┘        │
//! │                                                ▼                        │
//! │                                             Shipped ──► Delivered       │
//! │                                                                         │
//! │  Terminal: Delivered, Cancelled (empty allowed set)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `addPayment` bypasses this table: a settled payment moves the order
//! straight to `PaymentSettled` from whatever state it was in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

/// The state of an order.
///
/// Serialized with the same PascalCase names the storefront client uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum OrderState {
    /// Cart phase: lines, coupons, shipping can change.
    #[default]
    AddingItems,
    /// Checkout started, waiting on payment.
    ArrangingPayment,
    /// Payment authorized but not captured.
    PaymentAuthorized,
    /// Payment captured; `orderPlacedAt` is stamped on entry.
    PaymentSettled,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderState {
    /// Every state, in lifecycle order.
    pub const ALL: [OrderState; 7] = [
        OrderState::AddingItems,
        OrderState::ArrangingPayment,
        OrderState::PaymentAuthorized,
        OrderState::PaymentSettled,
        OrderState::Shipped,
        OrderState::Delivered,
        OrderState::Cancelled,
    ];

    /// States reachable from `self` in one transition.
    pub const fn allowed_transitions(self) -> &'static [OrderState] {
        match self {
            OrderState::AddingItems => &[OrderState::ArrangingPayment],
            OrderState::ArrangingPayment => {
                &[OrderState::PaymentAuthorized, OrderState::PaymentSettled]
            }
            OrderState::PaymentAuthorized => &[OrderState::PaymentSettled, OrderState::Cancelled],
            OrderState::PaymentSettled => &[OrderState::Shipped, OrderState::Cancelled],
            OrderState::Shipped => &[OrderState::Delivered],
            OrderState::Delivered | OrderState::Cancelled => &[],
        }
    }

    /// Checks whether `target` is in the allowed set of `self`.
    pub fn can_transition_to(self, target: OrderState) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Terminal states have no outgoing transitions.
    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Resolves a requested transition by name.
    ///
    /// Unknown names and disallowed targets fail the same way, with the raw
    /// requested name carried in the error.
    pub fn transition(self, requested: &str) -> CoreResult<OrderState> {
        match requested.parse::<OrderState>() {
            Ok(target) if self.can_transition_to(target) => Ok(target),
            _ => Err(CoreError::OrderStateTransition {
                from: self,
                to: requested.to_string(),
            }),
        }
    }

    /// Wire name of the state.
    pub const fn as_str(self) -> &'static str {
        match self {
            OrderState::AddingItems => "AddingItems",
            OrderState::ArrangingPayment => "ArrangingPayment",
            OrderState::PaymentAuthorized => "PaymentAuthorized",
            OrderState::PaymentSettled => "PaymentSettled",
            OrderState::Shipped => "Shipped",
            OrderState::Delivered => "Delivered",
            OrderState::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no order state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown order state: {0}")]
pub struct UnknownOrderState(pub String);

impl FromStr for OrderState {
    type Err = UnknownOrderState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| UnknownOrderState(s.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
