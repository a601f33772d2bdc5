//! Fungible asset token
//!
//! Minimal ERC20-style ledger for the traded asset: balances, allowances,
//! and a faucet that mints a fixed amount to whoever taps it.

use std::collections::HashMap;

use tracing::debug;
use types::ids::AccountId;
use types::numeric::Amount;

use crate::errors::TokenError;
use crate::events::{Approval, ContractEvent, Tapped, Transfer};

/// Amount minted to the caller by one `tap`
pub const TAP_AMOUNT: Amount = Amount::new(100_000);

#[derive(Debug, Clone)]
pub struct Token {
    symbol: String,
    balances: HashMap<AccountId, Amount>,
    /// (owner, spender) -> remaining allowance
    allowances: HashMap<(AccountId, AccountId), Amount>,
    total_supply: Amount,
    events: Vec<ContractEvent>,
}

impl Token {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            balances: HashMap::new(),
            allowances: HashMap::new(),
            total_supply: Amount::ZERO,
            events: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    // ───────────────────────── Faucet ─────────────────────────

    /// Mint `TAP_AMOUNT` to the caller
    pub fn tap(&mut self, caller: AccountId) -> Result<ContractEvent, TokenError> {
        let total_supply = self
            .total_supply
            .checked_add(TAP_AMOUNT)
            .ok_or(TokenError::Overflow)?;
        self.total_supply = total_supply;

        // Every balance is bounded by the total supply
        let balance = self.balances.entry(caller).or_default();
        *balance = balance.saturating_add(TAP_AMOUNT);

        debug!(account = %caller, amount = %TAP_AMOUNT, symbol = %self.symbol, "Faucet tapped");
        Ok(self.emit(ContractEvent::Tapped(Tapped {
            account_id: caller,
            amount: TAP_AMOUNT,
        })))
    }

    // ───────────────────────── Transfers ─────────────────────────

    /// Move `amount` from the caller to `to`
    pub fn transfer(
        &mut self,
        caller: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<ContractEvent, TokenError> {
        self.move_balance(caller, to, amount)?;
        Ok(self.emit(ContractEvent::Transfer(Transfer {
            from: caller,
            to,
            amount,
        })))
    }

    /// Let `spender` move up to `amount` of the caller's balance
    ///
    /// Overwrites any previous allowance.
    pub fn approve(&mut self, caller: AccountId, spender: AccountId, amount: Amount) -> ContractEvent {
        self.allowances.insert((caller, spender), amount);
        self.emit(ContractEvent::Approval(Approval {
            owner: caller,
            spender,
            amount,
        }))
    }

    pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Amount {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Move `amount` from `from` to `to`, spending the caller's allowance
    pub fn transfer_from(
        &mut self,
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<ContractEvent, TokenError> {
        let approved = self.allowance(from, caller);
        let remaining = approved
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientAllowance {
                required: amount,
                approved,
            })?;

        self.move_balance(from, to, amount)?;
        self.allowances.insert((from, caller), remaining);

        Ok(self.emit(ContractEvent::Transfer(Transfer { from, to, amount })))
    }

    // ───────────────────────── Queries ─────────────────────────

    pub fn balance_of(&self, account: AccountId) -> Amount {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    // ───────────────────────── Events ─────────────────────────

    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal ─────────────────────────

    fn move_balance(&mut self, from: AccountId, to: AccountId, amount: Amount) -> Result<(), TokenError> {
        let available = self.balance_of(from);
        let debited = available
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientFunds {
                required: amount,
                available,
            })?;

        self.balances.insert(from, debited);
        let credited = self.balances.entry(to).or_default();
        *credited = credited.saturating_add(amount);
        Ok(())
    }

    fn emit(&mut self, event: ContractEvent) -> ContractEvent {
        self.events.push(event.clone());
        event
    }
}
