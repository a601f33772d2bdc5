//! Fill (execution) records
//!
//! One `Fill` is produced per crossing of an incoming order with a resting
//! order. The execution price is always the resting (maker) order's price.

use crate::ids::{AccountId, OrderUid};
use crate::numeric::{Amount, Price, Quantity};
use crate::order::Side;
use serde::{Deserialize, Serialize};

/// A single execution between a resting maker and an incoming taker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    /// Engine-wide monotonic sequence
    pub sequence: u64,

    pub maker_uid: OrderUid,
    pub taker_uid: OrderUid,

    /// Side of the incoming (taker) order
    pub taker_side: Side,

    pub bid_owner: AccountId,
    pub ask_owner: AccountId,

    pub price: Price,
    pub quantity: Quantity,
    /// price × quantity, in currency units
    pub notional: Amount,

    /// Unix seconds of the submission that produced the fill
    pub executed_at: i64,
}

impl Fill {
    /// Create a fill; the notional is derived from price and quantity
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence: u64,
        maker_uid: OrderUid,
        taker_uid: OrderUid,
        taker_side: Side,
        bid_owner: AccountId,
        ask_owner: AccountId,
        price: Price,
        quantity: Quantity,
        executed_at: i64,
    ) -> Self {
        Self {
            sequence,
            maker_uid,
            taker_uid,
            taker_side,
            bid_owner,
            ask_owner,
            price,
            quantity,
            notional: price.notional(quantity),
            executed_at,
        }
    }

    /// Uid of the bid taking part in the fill
    pub fn bid_uid(&self) -> OrderUid {
        match self.taker_side {
            Side::Bid => self.taker_uid,
            Side::Ask => self.maker_uid,
        }
    }

    /// Uid of the ask taking part in the fill
    pub fn ask_uid(&self) -> OrderUid {
        match self.taker_side {
            Side::Bid => self.maker_uid,
            Side::Ask => self.taker_uid,
        }
    }
}
