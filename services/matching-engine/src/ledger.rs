//! In-process balance ledger
//!
//! Self-custodial settlement: every account keeps an asset and a currency
//! `Balance`, and escrow is simply the locked part of that balance.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;
use types::account::{AccountBalances, Balance, Holding};
use types::errors::SettlementError;
use types::ids::AccountId;
use types::numeric::Amount;

use crate::settlement::Settlement;

/// Errors from funding the ledger
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid amount: deposits must be positive")]
    InvalidAmount,

    #[error("Arithmetic overflow: {holding} supply would exceed its bound")]
    Overflow { holding: Holding },
}

/// Balances of every account, plus the total supply per holding
///
/// Value only enters through deposits and never leaves, so the supply is the
/// sum of all account totals and transfers can never overflow.
#[derive(Debug, Clone, Default)]
pub struct InternalLedger {
    accounts: HashMap<AccountId, AccountBalances>,
    asset_supply: Amount,
    currency_supply: Amount,
}

impl InternalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` of `holding` to the account's available balance
    pub fn deposit(
        &mut self,
        owner: AccountId,
        holding: Holding,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount);
        }

        let supply = match holding {
            Holding::Asset => &mut self.asset_supply,
            Holding::Currency => &mut self.currency_supply,
        };
        *supply = supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow { holding })?;

        // Bounded by the supply check above
        let credited = self.balance_mut(owner, holding).credit(amount);
        assert!(credited.is_some(), "Account total exceeds supply");

        debug!(owner = %owner, holding = %holding, amount = %amount, "Deposit credited");
        Ok(())
    }

    pub fn deposit_asset(&mut self, owner: AccountId, amount: Amount) -> Result<(), LedgerError> {
        self.deposit(owner, Holding::Asset, amount)
    }

    pub fn deposit_currency(&mut self, owner: AccountId, amount: Amount) -> Result<(), LedgerError> {
        self.deposit(owner, Holding::Currency, amount)
    }

    /// Balance of one holding; unknown accounts hold nothing
    pub fn balance(&self, owner: AccountId, holding: Holding) -> Balance {
        self.accounts
            .get(&owner)
            .map(|balances| *balances.get(holding))
            .unwrap_or_default()
    }

    pub fn asset_balance(&self, owner: AccountId) -> Balance {
        self.balance(owner, Holding::Asset)
    }

    pub fn currency_balance(&self, owner: AccountId) -> Balance {
        self.balance(owner, Holding::Currency)
    }

    /// Sum of all deposits of `holding`
    pub fn supply(&self, holding: Holding) -> Amount {
        match holding {
            Holding::Asset => self.asset_supply,
            Holding::Currency => self.currency_supply,
        }
    }

    /// Sum of `holding` locked as escrow across all accounts
    pub fn total_locked(&self, holding: Holding) -> Amount {
        self.accounts
            .values()
            .fold(Amount::ZERO, |total, balances| {
                total.saturating_add(balances.get(holding).locked)
            })
    }

    fn lock(&mut self, owner: AccountId, holding: Holding, amount: Amount) -> Result<(), SettlementError> {
        let available = self.balance(owner, holding).available;
        if amount > available {
            return Err(SettlementError::InsufficientBalance {
                holding,
                required: amount,
                available,
            });
        }
        self.balance_mut(owner, holding).lock(amount);
        Ok(())
    }

    fn balance_mut(&mut self, owner: AccountId, holding: Holding) -> &mut Balance {
        self.accounts.entry(owner).or_default().get_mut(holding)
    }

    fn transfer(&mut self, from: AccountId, to: AccountId, holding: Holding, amount: Amount) {
        self.balance_mut(from, holding).deduct_locked(amount);
        let credited = self.balance_mut(to, holding).credit(amount);
        assert!(credited.is_some(), "Account total exceeds supply");
    }
}

impl Settlement for InternalLedger {
    fn escrow_currency(&mut self, owner: AccountId, amount: Amount) -> Result<(), SettlementError> {
        self.lock(owner, Holding::Currency, amount)
    }

    fn escrow_asset(&mut self, owner: AccountId, amount: Amount) -> Result<(), SettlementError> {
        self.lock(owner, Holding::Asset, amount)
    }

    fn release_currency(&mut self, owner: AccountId, amount: Amount) {
        self.balance_mut(owner, Holding::Currency).unlock(amount);
    }

    fn release_asset(&mut self, owner: AccountId, amount: Amount) {
        self.balance_mut(owner, Holding::Asset).unlock(amount);
    }

    fn transfer_currency(&mut self, from: AccountId, to: AccountId, amount: Amount) {
        self.transfer(from, to, Holding::Currency, amount);
    }

    fn transfer_asset(&mut self, from: AccountId, to: AccountId, amount: Amount) {
        self.transfer(from, to, Holding::Asset, amount);
    }
}
