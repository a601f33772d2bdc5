//! Settlement adapter contract
//!
//! The engine never touches balances directly. It asks the host to lock
//! escrow when an order is placed, to move escrowed value when orders fill,
//! and to hand unused escrow back when an order is canceled.
//!
//! Only locking can fail. Releases and transfers always operate on escrow the
//! engine locked earlier, so implementations treat a shortfall there as a
//! broken invariant rather than a recoverable error.

use types::account::Holding;
use types::errors::SettlementError;
use types::ids::AccountId;
use types::numeric::Amount;
use types::order::{Order, Side};

/// Value movement primitives consumed by the matching engine
pub trait Settlement {
    /// Lock `amount` of currency owned by `owner`
    fn escrow_currency(&mut self, owner: AccountId, amount: Amount) -> Result<(), SettlementError>;

    /// Lock `amount` of asset owned by `owner`
    fn escrow_asset(&mut self, owner: AccountId, amount: Amount) -> Result<(), SettlementError>;

    /// Return unused currency escrow to `owner`
    fn release_currency(&mut self, owner: AccountId, amount: Amount);

    /// Return unused asset escrow to `owner`
    fn release_asset(&mut self, owner: AccountId, amount: Amount);

    /// Move `amount` of currency out of `from`'s escrow to `to`
    fn transfer_currency(&mut self, from: AccountId, to: AccountId, amount: Amount);

    /// Move `amount` of asset out of `from`'s escrow to `to`
    fn transfer_asset(&mut self, from: AccountId, to: AccountId, amount: Amount);

    /// Lock the escrow an order on `side` needs
    fn escrow(&mut self, side: Side, owner: AccountId, amount: Amount) -> Result<(), SettlementError> {
        match side {
            Side::Bid => self.escrow_currency(owner, amount),
            Side::Ask => self.escrow_asset(owner, amount),
        }
    }

    /// Return whatever escrow still backs the order's remaining quantity
    fn release_remaining(&mut self, order: &Order) {
        let amount = order.locked_escrow();
        if amount.is_zero() {
            return;
        }
        match order.side {
            Side::Bid => self.release_currency(order.owner, amount),
            Side::Ask => self.release_asset(order.owner, amount),
        }
    }
}

/// Holding that backs orders on `side`
pub fn escrow_holding(side: Side) -> Holding {
    match side {
        Side::Bid => Holding::Currency,
        Side::Ask => Holding::Asset,
    }
}
