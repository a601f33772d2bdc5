//! Order lifecycle types
//!
//! An order is created open, may be partially filled while resting, and ends
//! either closed (fully filled) or canceled. Terminal orders never change.

use crate::ids::{AccountId, OrderUid};
use crate::numeric::{Amount, Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buy order, offers currency for asset
    Bid,
    /// Sell order, offers asset for currency
    Ask,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

/// Validity policy chosen at placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderFlags {
    /// Unmatched remainder is canceled instead of resting
    ImmediateOrCancel,
    /// Rests until `good_till`, retired lazily on a later submission
    TimeInForce,
    /// Rests until fully filled or explicitly canceled
    GoodTillCancel,
}

/// Which sequence of its side book the order currently lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderState {
    Open,
    Closed,
    Canceled,
}

impl OrderState {
    /// Check if state is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderState::Closed | OrderState::Canceled)
    }
}

/// A limit order
///
/// `quantity` is the remaining unfilled amount; `original_quantity` never
/// changes, so `original_quantity - quantity` is the amount filled so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub uid: OrderUid,
    pub owner: AccountId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub original_quantity: Quantity,
    pub flags: OrderFlags,
    /// Unix seconds; `0` means no expiry
    pub good_till: i64,
    pub state: OrderState,
}

impl Order {
    /// Create a new open order with nothing filled
    pub fn new(
        uid: OrderUid,
        owner: AccountId,
        side: Side,
        price: Price,
        quantity: Quantity,
        flags: OrderFlags,
        good_till: i64,
    ) -> Self {
        Self {
            uid,
            owner,
            side,
            price,
            quantity,
            original_quantity: quantity,
            flags,
            good_till,
            state: OrderState::Open,
        }
    }

    /// Check quantity invariant: 0 <= quantity <= original_quantity
    pub fn check_invariant(&self) -> bool {
        if self.quantity > self.original_quantity {
            return false;
        }
        match self.state {
            OrderState::Open => !self.quantity.is_zero(),
            OrderState::Closed => self.quantity.is_zero(),
            OrderState::Canceled => true,
        }
    }

    pub fn is_filled(&self) -> bool {
        self.quantity.is_zero()
    }

    /// Amount filled so far
    pub fn filled_quantity(&self) -> Quantity {
        self.original_quantity - self.quantity
    }

    /// Whether a TimeInForce order is past its deadline at `now`
    pub fn is_expired(&self, now: i64) -> bool {
        self.flags == OrderFlags::TimeInForce && self.good_till != 0 && self.good_till < now
    }

    /// Escrow backing `quantity` units of this order
    ///
    /// Currency for a bid, asset for an ask.
    pub fn escrow_for(&self, quantity: Quantity) -> Amount {
        match self.side {
            Side::Bid => self.price.notional(quantity),
            Side::Ask => quantity.as_amount(),
        }
    }

    /// Escrow still held for the unfilled remainder
    pub fn locked_escrow(&self) -> Amount {
        self.escrow_for(self.quantity)
    }

    /// Reduce the remaining quantity by a fill
    ///
    /// # Panics
    /// Panics if the fill exceeds the remaining quantity or the order is terminal
    pub fn apply_fill(&mut self, fill: Quantity) {
        assert!(!self.state.is_terminal(), "Cannot fill terminal order");
        assert!(fill <= self.quantity, "Fill would exceed order quantity");
        self.quantity = self.quantity - fill;
    }
}
