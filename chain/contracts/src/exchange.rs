//! Escrow exchange: order book contract over a token and a vault
//!
//! Asks escrow the token: the asset is pulled through the caller's allowance
//! into the exchange's custody account. Bids escrow native currency from the
//! caller's vault wallet. Matching, expiry and cancellation are delegated to
//! the matching engine; its lifecycle events are re-emitted as contract
//! events.

use std::collections::HashMap;

use matching_engine::engine::{MatchingEngine, OrderRequest, SubmitOutcome};
use matching_engine::{Clock, EngineConfig, Sequence, Settlement, SystemClock};
use tracing::{debug, info};
use types::account::Holding;
use types::errors::SettlementError;
use types::ids::{AccountId, OrderUid};
use types::numeric::{Amount, Price, Quantity};
use types::order::{Order, OrderFlags, Side};

use crate::errors::{ExchangeError, TokenError, VaultError};
use crate::events::ContractEvent;
use crate::security::ReentrancyGuard;
use crate::token::Token;
use crate::vault::Vault;

/// Settlement adapter over the exchange's custody
///
/// Borrows the exchange's fields for the duration of one engine call.
struct EscrowSettlement<'a> {
    token: &'a mut Token,
    vault: &'a mut Vault,
    custody: AccountId,
    asset_escrow: &'a mut HashMap<AccountId, Amount>,
}

impl EscrowSettlement<'_> {
    fn take_asset_escrow(&mut self, owner: AccountId, amount: Amount) {
        let escrow = self.asset_escrow.entry(owner).or_default();
        assert!(amount <= *escrow, "Insufficient escrowed asset");
        *escrow = escrow.saturating_sub(amount);
    }

    fn pay_asset(&mut self, to: AccountId, amount: Amount) {
        let paid = self.token.transfer(self.custody, to, amount);
        assert!(paid.is_ok(), "Custody holds less asset than escrowed");
    }
}

impl Settlement for EscrowSettlement<'_> {
    fn escrow_currency(&mut self, owner: AccountId, amount: Amount) -> Result<(), SettlementError> {
        self.vault.lock(owner, amount).map_err(|err| match err {
            VaultError::InsufficientBalance { required, available } => {
                SettlementError::InsufficientBalance {
                    holding: Holding::Currency,
                    required,
                    available,
                }
            }
            other => SettlementError::Unavailable {
                reason: other.to_string(),
            },
        })
    }

    fn escrow_asset(&mut self, owner: AccountId, amount: Amount) -> Result<(), SettlementError> {
        self.token
            .transfer_from(self.custody, owner, self.custody, amount)
            .map_err(|err| match err {
                TokenError::InsufficientFunds { required, available } => {
                    SettlementError::InsufficientBalance {
                        holding: Holding::Asset,
                        required,
                        available,
                    }
                }
                TokenError::InsufficientAllowance { required, approved } => {
                    SettlementError::InsufficientBalance {
                        holding: Holding::Asset,
                        required,
                        available: approved,
                    }
                }
                other => SettlementError::Unavailable {
                    reason: other.to_string(),
                },
            })?;

        let escrow = self.asset_escrow.entry(owner).or_default();
        *escrow = escrow.saturating_add(amount);
        debug!(owner = %owner, amount = %amount, "Asset pulled into custody");
        Ok(())
    }

    fn release_currency(&mut self, owner: AccountId, amount: Amount) {
        self.vault.unlock(owner, amount);
    }

    fn release_asset(&mut self, owner: AccountId, amount: Amount) {
        self.take_asset_escrow(owner, amount);
        self.pay_asset(owner, amount);
    }

    fn transfer_currency(&mut self, from: AccountId, to: AccountId, amount: Amount) {
        self.vault.pay(from, to, amount);
    }

    fn transfer_asset(&mut self, from: AccountId, to: AccountId, amount: Amount) {
        self.take_asset_escrow(from, amount);
        self.pay_asset(to, amount);
    }
}

/// Order book exchange contract
#[derive(Debug)]
pub struct EscrowExchange<C: Clock = SystemClock> {
    engine: MatchingEngine,
    token: Token,
    vault: Vault,
    /// Account holding escrowed asset; the spender callers approve
    custody: AccountId,
    /// Asset escrowed per owner, all of it held by `custody`
    asset_escrow: HashMap<AccountId, Amount>,
    clock: C,
    reentrancy_guard: ReentrancyGuard,
    /// Emitted events log (append-only)
    events: Vec<ContractEvent>,
}

impl EscrowExchange<SystemClock> {
    /// Deploy over an existing token, with `admin` owning the vault
    pub fn new(token: Token, admin: AccountId) -> Self {
        Self::with_clock(token, admin, EngineConfig::default(), SystemClock)
    }
}

impl<C: Clock> EscrowExchange<C> {
    pub fn with_clock(token: Token, admin: AccountId, config: EngineConfig, clock: C) -> Self {
        let custody = AccountId::new();
        info!(custody = %custody, symbol = token.symbol(), "EscrowExchange deployed");

        Self {
            engine: MatchingEngine::with_config(config),
            token,
            vault: Vault::new(admin),
            custody,
            asset_escrow: HashMap::new(),
            clock,
            reentrancy_guard: ReentrancyGuard::new(),
            events: Vec::new(),
        }
    }

    /// Account to approve before placing asks
    pub fn custody(&self) -> AccountId {
        self.custody
    }

    // ───────────────────────── Orders ─────────────────────────

    /// Place a limit order for `caller`
    ///
    /// `value` is the currency attached to a bid; it must cover
    /// `price × quantity` and only that much is taken from the caller's
    /// wallet. Asks ignore `value` and pull `quantity` of the token through
    /// the caller's allowance to the custody account.
    #[allow(clippy::too_many_arguments)]
    pub fn limit_order(
        &mut self,
        caller: AccountId,
        uid: OrderUid,
        side: Side,
        price: Price,
        quantity: Quantity,
        flags: OrderFlags,
        good_till: i64,
        value: Amount,
    ) -> Result<SubmitOutcome, ExchangeError> {
        if self.vault.is_paused() {
            return Err(VaultError::Paused.into());
        }
        self.check_reentrancy()?;

        let mut request = OrderRequest::new(uid, caller, side, price, quantity, flags, good_till);
        if side == Side::Bid {
            request = request.with_escrow(value);
        }

        let now = self.clock.now();
        let mut settlement = EscrowSettlement {
            token: &mut self.token,
            vault: &mut self.vault,
            custody: self.custody,
            asset_escrow: &mut self.asset_escrow,
        };
        let result = self.engine.submit(&mut settlement, request, now);
        self.reentrancy_guard.release();

        let outcome = result?;
        self.events
            .extend(outcome.events.iter().map(|event| ContractEvent::from(*event)));
        Ok(outcome)
    }

    /// Cancel one of `caller`'s open orders. Allowed while paused.
    pub fn cancel_order(&mut self, caller: AccountId, uid: OrderUid) -> Result<ContractEvent, ExchangeError> {
        self.check_reentrancy()?;

        let mut settlement = EscrowSettlement {
            token: &mut self.token,
            vault: &mut self.vault,
            custody: self.custody,
            asset_escrow: &mut self.asset_escrow,
        };
        let result = self.engine.cancel(&mut settlement, uid, caller);
        self.reentrancy_guard.release();

        let event = ContractEvent::from(result?);
        self.events.push(event.clone());
        Ok(event)
    }

    // ───────────────────────── Book Accessors ─────────────────────────

    pub fn asks(&self, index: usize) -> Option<&Order> {
        self.engine.order_at(Side::Ask, Sequence::Open, index)
    }

    pub fn bids(&self, index: usize) -> Option<&Order> {
        self.engine.order_at(Side::Bid, Sequence::Open, index)
    }

    pub fn closed_asks(&self, index: usize) -> Option<&Order> {
        self.engine.order_at(Side::Ask, Sequence::Closed, index)
    }

    pub fn closed_bids(&self, index: usize) -> Option<&Order> {
        self.engine.order_at(Side::Bid, Sequence::Closed, index)
    }

    pub fn canceled_asks(&self, index: usize) -> Option<&Order> {
        self.engine.order_at(Side::Ask, Sequence::Canceled, index)
    }

    pub fn canceled_bids(&self, index: usize) -> Option<&Order> {
        self.engine.order_at(Side::Bid, Sequence::Canceled, index)
    }

    pub fn amount_of_open_asks(&self) -> usize {
        self.engine.count(Side::Ask, Sequence::Open)
    }

    pub fn amount_of_open_bids(&self) -> usize {
        self.engine.count(Side::Bid, Sequence::Open)
    }

    pub fn amount_of_closed_asks(&self) -> usize {
        self.engine.count(Side::Ask, Sequence::Closed)
    }

    pub fn amount_of_closed_bids(&self) -> usize {
        self.engine.count(Side::Bid, Sequence::Closed)
    }

    pub fn amount_of_canceled_asks(&self) -> usize {
        self.engine.count(Side::Ask, Sequence::Canceled)
    }

    pub fn amount_of_canceled_bids(&self) -> usize {
        self.engine.count(Side::Bid, Sequence::Canceled)
    }

    // ───────────────────────── Custody Accessors ─────────────────────────

    /// Asset escrowed for the owner's open asks
    pub fn escrowed_asset(&self, owner: AccountId) -> Amount {
        self.asset_escrow.get(&owner).copied().unwrap_or_default()
    }

    pub fn engine(&self) -> &MatchingEngine {
        &self.engine
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Token access for taps, approvals and transfers
    pub fn token_mut(&mut self) -> &mut Token {
        &mut self.token
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    /// Vault access for deposits, withdrawals and pausing
    pub fn vault_mut(&mut self) -> &mut Vault {
        &mut self.vault
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ───────────────────────── Events ─────────────────────────

    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    fn check_reentrancy(&mut self) -> Result<(), VaultError> {
        if !self.reentrancy_guard.acquire() {
            return Err(VaultError::Reentrancy);
        }
        Ok(())
    }
}
