//! Account and balance types
//!
//! A market trades exactly two holdings: the asset and the currency it is
//! priced in. Each account keeps one `Balance` per holding.

use crate::numeric::Amount;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two holdings a market moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Holding {
    /// The traded asset (what asks sell)
    Asset,
    /// The pricing currency (what bids pay)
    Currency,
}

impl fmt::Display for Holding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Holding::Asset => write!(f, "asset"),
            Holding::Currency => write!(f, "currency"),
        }
    }
}

/// Balance for a single holding
///
/// Invariant: total = available + locked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub total: Amount,
    pub available: Amount,
    pub locked: Amount,
}

impl Balance {
    /// Create a new balance, all of it available
    pub fn new(total: Amount) -> Self {
        Self {
            total,
            available: total,
            locked: Amount::ZERO,
        }
    }

    /// Check balance invariant: total = available + locked
    pub fn check_invariant(&self) -> bool {
        self.available.checked_add(self.locked) == Some(self.total)
    }

    /// Whether `amount` can be locked right now
    pub fn can_lock(&self, amount: Amount) -> bool {
        amount <= self.available
    }

    /// Lock a portion of available balance
    ///
    /// # Panics
    /// Panics if amount exceeds available
    pub fn lock(&mut self, amount: Amount) {
        assert!(self.can_lock(amount), "Insufficient available balance");

        self.available = self.available.saturating_sub(amount);
        self.locked = self.locked.saturating_add(amount);

        assert!(self.check_invariant(), "Invariant violated after lock");
    }

    /// Unlock a portion of locked balance
    ///
    /// # Panics
    /// Panics if amount exceeds locked
    pub fn unlock(&mut self, amount: Amount) {
        assert!(amount <= self.locked, "Insufficient locked balance");

        self.locked = self.locked.saturating_sub(amount);
        self.available = self.available.saturating_add(amount);

        assert!(self.check_invariant(), "Invariant violated after unlock");
    }

    /// Deduct from locked balance (e.g., after order fill)
    pub fn deduct_locked(&mut self, amount: Amount) {
        assert!(amount <= self.locked, "Insufficient locked balance");

        self.locked = self.locked.saturating_sub(amount);
        self.total = self.total.saturating_sub(amount);

        assert!(self.check_invariant(), "Invariant violated after deduct");
    }

    /// Credit to available balance (e.g., deposit, trade settlement)
    ///
    /// Returns `None` if the total would overflow.
    pub fn credit(&mut self, amount: Amount) -> Option<()> {
        let total = self.total.checked_add(amount)?;
        let available = self.available.checked_add(amount)?;
        self.total = total;
        self.available = available;
        Some(())
    }
}

/// Both holdings of one account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalances {
    pub asset: Balance,
    pub currency: Balance,
}

impl AccountBalances {
    pub fn get(&self, holding: Holding) -> &Balance {
        match holding {
            Holding::Asset => &self.asset,
            Holding::Currency => &self.currency,
        }
    }

    pub fn get_mut(&mut self, holding: Holding) -> &mut Balance {
        match holding {
            Holding::Asset => &mut self.asset,
            Holding::Currency => &mut self.currency,
        }
    }
}
