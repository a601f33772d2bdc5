//! Vault: native-currency custody
//!
//! Holds the currency side of the exchange:
//! - Wallet balances per account (deposit, withdraw)
//! - Escrow per account, locked for open bids
//! - Settlement moves out of escrow into counterparties' wallets
//! - Pause modifier, access control, reentrancy guard

use std::collections::HashMap;

use tracing::debug;
use types::ids::AccountId;
use types::numeric::Amount;

use crate::errors::VaultError;
use crate::events::{ContractEvent, Deposited, PauseChanged, Withdrawn};
use crate::security::{AccessControl, PauseGuard, ReentrancyGuard, Role};

/// Core vault contract managing currency custody.
///
/// Every unit of currency the vault holds is either in some wallet or in some
/// escrow, so `supply == Σ wallets + Σ escrow` at all times.
///
/// User-facing state-changing operations check:
/// 1. Reentrancy guard
/// 2. Pause state (deposits only)
/// 3. Access control (where applicable)
#[derive(Debug)]
pub struct Vault {
    /// Spendable currency per account
    wallets: HashMap<AccountId, Amount>,
    /// Currency locked behind open bids
    escrow: HashMap<AccountId, Amount>,
    /// Total currency held
    supply: Amount,
    reentrancy_guard: ReentrancyGuard,
    pause_guard: PauseGuard,
    access_control: AccessControl,
    /// Emitted events log (append-only)
    events: Vec<ContractEvent>,
}

impl Vault {
    /// Create a new vault with an admin account.
    pub fn new(admin: AccountId) -> Self {
        Self {
            wallets: HashMap::new(),
            escrow: HashMap::new(),
            supply: Amount::ZERO,
            reentrancy_guard: ReentrancyGuard::new(),
            pause_guard: PauseGuard::new(),
            access_control: AccessControl::new(admin),
            events: Vec::new(),
        }
    }

    // ───────────────────────── Deposit / Withdraw ─────────────────────────

    /// Credit native currency to an account's wallet.
    ///
    /// Validates: not paused, no reentrancy, amount positive.
    pub fn deposit(&mut self, account_id: AccountId, amount: Amount) -> Result<ContractEvent, VaultError> {
        self.check_not_paused()?;
        self.check_reentrancy()?;

        let result = self.credit_deposit(account_id, amount);
        self.reentrancy_guard.release();
        result
    }

    fn credit_deposit(&mut self, account_id: AccountId, amount: Amount) -> Result<ContractEvent, VaultError> {
        if amount.is_zero() {
            return Err(VaultError::InvalidAmount);
        }
        self.supply = self.supply.checked_add(amount).ok_or(VaultError::Overflow)?;
        // Bounded by the supply check above
        let wallet = self.wallets.entry(account_id).or_default();
        *wallet = wallet.saturating_add(amount);

        debug!(account = %account_id, amount = %amount, "Currency deposited");
        Ok(self.emit(ContractEvent::Deposited(Deposited { account_id, amount })))
    }

    /// Pay currency out of an account's wallet. Allowed while paused.
    pub fn withdraw(&mut self, account_id: AccountId, amount: Amount) -> Result<ContractEvent, VaultError> {
        self.check_reentrancy()?;

        let result = self.safe_debit(account_id, amount).map(|()| {
            self.supply = self.supply.saturating_sub(amount);
            debug!(account = %account_id, amount = %amount, "Currency withdrawn");
            self.emit(ContractEvent::Withdrawn(Withdrawn { account_id, amount }))
        });
        self.reentrancy_guard.release();
        result
    }

    // ───────────────────────── Balance Queries ─────────────────────────

    /// Spendable wallet balance
    pub fn get_balance(&self, account_id: AccountId) -> Amount {
        self.wallets.get(&account_id).copied().unwrap_or_default()
    }

    /// Currency locked for the account's open bids
    pub fn escrowed(&self, account_id: AccountId) -> Amount {
        self.escrow.get(&account_id).copied().unwrap_or_default()
    }

    pub fn total_escrowed(&self) -> Amount {
        self.escrow
            .values()
            .fold(Amount::ZERO, |total, amount| total.saturating_add(*amount))
    }

    pub fn supply(&self) -> Amount {
        self.supply
    }

    // ───────────────────────── Escrow ─────────────────────────

    /// Move `amount` from the wallet into escrow
    pub(crate) fn lock(&mut self, account_id: AccountId, amount: Amount) -> Result<(), VaultError> {
        self.safe_debit(account_id, amount)?;
        let escrow = self.escrow.entry(account_id).or_default();
        *escrow = escrow.saturating_add(amount);
        Ok(())
    }

    /// Move `amount` from escrow back to the owner's wallet
    ///
    /// # Panics
    /// Panics if the owner's escrow is smaller than `amount`
    pub(crate) fn unlock(&mut self, account_id: AccountId, amount: Amount) {
        self.take_escrow(account_id, amount);
        self.credit_wallet(account_id, amount);
    }

    /// Pay `amount` out of `from`'s escrow into `to`'s wallet
    ///
    /// # Panics
    /// Panics if `from`'s escrow is smaller than `amount`
    pub(crate) fn pay(&mut self, from: AccountId, to: AccountId, amount: Amount) {
        self.take_escrow(from, amount);
        self.credit_wallet(to, amount);
        debug!(from = %from, to = %to, amount = %amount, "Escrowed currency paid");
    }

    fn take_escrow(&mut self, account_id: AccountId, amount: Amount) {
        let escrow = self.escrow.entry(account_id).or_default();
        assert!(amount <= *escrow, "Insufficient escrowed balance");
        *escrow = escrow.saturating_sub(amount);
    }

    fn credit_wallet(&mut self, account_id: AccountId, amount: Amount) {
        let wallet = self.wallets.entry(account_id).or_default();
        *wallet = wallet.saturating_add(amount);
    }

    /// Internal debit with underflow protection.
    fn safe_debit(&mut self, account_id: AccountId, amount: Amount) -> Result<(), VaultError> {
        let available = self.get_balance(account_id);
        let remaining = available
            .checked_sub(amount)
            .ok_or(VaultError::InsufficientBalance {
                required: amount,
                available,
            })?;
        self.wallets.insert(account_id, remaining);
        Ok(())
    }

    // ───────────────────────── Pause ─────────────────────────

    /// Pause the vault. Admin or pauser only.
    pub fn pause(&mut self, caller: AccountId) -> Result<ContractEvent, VaultError> {
        self.set_paused(caller, true)
    }

    /// Unpause the vault. Admin or pauser only.
    pub fn unpause(&mut self, caller: AccountId) -> Result<ContractEvent, VaultError> {
        self.set_paused(caller, false)
    }

    fn set_paused(&mut self, caller: AccountId, paused: bool) -> Result<ContractEvent, VaultError> {
        if !self.access_control.can_pause(caller) {
            return Err(VaultError::Unauthorized);
        }
        if paused {
            self.pause_guard.pause();
        } else {
            self.pause_guard.unpause();
        }
        debug!(by = %caller, paused, "Pause switch changed");
        Ok(self.emit(ContractEvent::PauseChanged(PauseChanged { by: caller, paused })))
    }

    pub fn is_paused(&self) -> bool {
        self.pause_guard.is_paused()
    }

    // ───────────────────────── Access Control ─────────────────────────

    /// Grant the pauser role. Admin-only.
    pub fn grant_pauser(&mut self, caller: AccountId, target: AccountId) -> Result<(), VaultError> {
        if !self.access_control.grant_role(caller, target, Role::Pauser) {
            return Err(VaultError::Unauthorized);
        }
        Ok(())
    }

    /// Revoke any role from an account. Admin-only.
    pub fn revoke_role(&mut self, caller: AccountId, target: AccountId) -> Result<(), VaultError> {
        if !self.access_control.is_admin(caller) {
            return Err(VaultError::Unauthorized);
        }
        self.access_control.revoke_role(caller, target);
        Ok(())
    }

    /// Transfer admin to a new account.
    pub fn set_admin(&mut self, current_admin: AccountId, new_admin: AccountId) -> Result<(), VaultError> {
        if !self.access_control.transfer_admin(current_admin, new_admin) {
            return Err(VaultError::Unauthorized);
        }
        Ok(())
    }

    pub fn admin(&self) -> AccountId {
        self.access_control.admin()
    }

    // ───────────────────────── Events ─────────────────────────

    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal Guards ─────────────────────────

    fn emit(&mut self, event: ContractEvent) -> ContractEvent {
        self.events.push(event.clone());
        event
    }

    fn check_not_paused(&self) -> Result<(), VaultError> {
        if self.pause_guard.is_paused() {
            return Err(VaultError::Paused);
        }
        Ok(())
    }

    fn check_reentrancy(&mut self) -> Result<(), VaultError> {
        if !self.reentrancy_guard.acquire() {
            return Err(VaultError::Reentrancy);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_vault() -> (Vault, AccountId) {
        let admin = AccountId::new();
        (Vault::new(admin), admin)
    }

    // ─── Deposit tests ───

    #[test]
    fn test_deposit_success() {
        let (mut vault, _) = setup_vault();
        let account = AccountId::new();

        let event = vault.deposit(account, Amount::new(200)).unwrap();

        assert!(matches!(event, ContractEvent::Deposited(_)));
        assert_eq!(vault.get_balance(account), Amount::new(200));
        assert_eq!(vault.supply(), Amount::new(200));
    }

    #[test]
    fn test_deposit_accumulates() {
        let (mut vault, _) = setup_vault();
        let account = AccountId::new();

        vault.deposit(account, Amount::new(1_000)).unwrap();
        vault.deposit(account, Amount::new(500)).unwrap();

        assert_eq!(vault.get_balance(account), Amount::new(1_500));
    }

    #[test]
    fn test_deposit_zero_rejected_and_guard_released() {
        let (mut vault, _) = setup_vault();
        let account = AccountId::new();

        assert_eq!(vault.deposit(account, Amount::ZERO), Err(VaultError::InvalidAmount));
        vault.deposit(account, Amount::new(1)).unwrap();
    }

    #[test]
    fn test_deposit_overflow_rejected() {
        let (mut vault, _) = setup_vault();
        vault.deposit(AccountId::new(), Amount::new(u128::MAX)).unwrap();

        let result = vault.deposit(AccountId::new(), Amount::new(1));

        assert_eq!(result, Err(VaultError::Overflow));
        assert_eq!(vault.supply(), Amount::new(u128::MAX));
    }

    #[test]
    fn test_withdraw_insufficient() {
        let (mut vault, _) = setup_vault();
        let account = AccountId::new();
        vault.deposit(account, Amount::new(10)).unwrap();

        let result = vault.withdraw(account, Amount::new(11));

        assert_eq!(
            result,
            Err(VaultError::InsufficientBalance {
                required: Amount::new(11),
                available: Amount::new(10),
            })
        );
        vault.withdraw(account, Amount::new(10)).unwrap();
        assert_eq!(vault.supply(), Amount::ZERO);
    }

    // ─── Escrow tests ───

    #[test]
    fn test_lock_unlock_cycle() {
        let (mut vault, _) = setup_vault();
        let account = AccountId::new();
        vault.deposit(account, Amount::new(300)).unwrap();

        vault.lock(account, Amount::new(200)).unwrap();
        assert_eq!(vault.get_balance(account), Amount::new(100));
        assert_eq!(vault.escrowed(account), Amount::new(200));

        vault.unlock(account, Amount::new(200));
        assert_eq!(vault.get_balance(account), Amount::new(300));
        assert_eq!(vault.total_escrowed(), Amount::ZERO);
    }

    #[test]
    fn test_lock_more_than_wallet_fails() {
        let (mut vault, _) = setup_vault();
        let account = AccountId::new();
        vault.deposit(account, Amount::new(100)).unwrap();

        assert!(vault.lock(account, Amount::new(101)).is_err());
        assert_eq!(vault.escrowed(account), Amount::ZERO);
    }

    #[test]
    fn test_pay_moves_escrow_to_counterparty() {
        let (mut vault, _) = setup_vault();
        let buyer = AccountId::new();
        let seller = AccountId::new();
        vault.deposit(buyer, Amount::new(200)).unwrap();
        vault.lock(buyer, Amount::new(200)).unwrap();

        vault.pay(buyer, seller, Amount::new(150));

        assert_eq!(vault.escrowed(buyer), Amount::new(50));
        assert_eq!(vault.get_balance(seller), Amount::new(150));
    }

    #[test]
    #[should_panic(expected = "Insufficient escrowed balance")]
    fn test_unlock_more_than_escrow_panics() {
        let (mut vault, _) = setup_vault();
        vault.unlock(AccountId::new(), Amount::new(1));
    }

    // ─── Pause tests ───

    #[test]
    fn test_pause_blocks_deposit() {
        let (mut vault, admin) = setup_vault();
        vault.pause(admin).unwrap();

        assert_eq!(vault.deposit(AccountId::new(), Amount::new(1)), Err(VaultError::Paused));

        vault.unpause(admin).unwrap();
        vault.deposit(AccountId::new(), Amount::new(1)).unwrap();
    }

    #[test]
    fn test_pause_allows_withdraw() {
        let (mut vault, admin) = setup_vault();
        let account = AccountId::new();
        vault.deposit(account, Amount::new(5)).unwrap();
        vault.pause(admin).unwrap();

        vault.withdraw(account, Amount::new(5)).unwrap();
        assert_eq!(vault.get_balance(account), Amount::ZERO);
    }

    #[test]
    fn test_pauser_role() {
        let (mut vault, admin) = setup_vault();
        let guardian = AccountId::new();

        assert_eq!(vault.pause(guardian), Err(VaultError::Unauthorized));
        vault.grant_pauser(admin, guardian).unwrap();
        vault.pause(guardian).unwrap();
        assert!(vault.is_paused());

        vault.revoke_role(admin, guardian).unwrap();
        assert_eq!(vault.unpause(guardian), Err(VaultError::Unauthorized));
    }

    #[test]
    fn test_set_admin() {
        let (mut vault, admin) = setup_vault();
        let next = AccountId::new();

        vault.set_admin(admin, next).unwrap();

        assert_eq!(vault.admin(), next);
        assert_eq!(vault.pause(admin), Err(VaultError::Unauthorized));
    }
}
