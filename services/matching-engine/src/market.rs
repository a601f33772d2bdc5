//! Self-custodial market
//!
//! Pairs a `MatchingEngine` with an `InternalLedger` and a `Clock`: callers
//! deposit into the ledger, and orders escrow directly from their balances.

use types::errors::EngineError;
use types::ids::{AccountId, OrderUid};

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::engine::{MatchingEngine, OrderRequest, SubmitOutcome};
use crate::events::OrderEvent;
use crate::ledger::InternalLedger;

#[derive(Debug)]
pub struct LedgerMarket<C: Clock = SystemClock> {
    engine: MatchingEngine,
    ledger: InternalLedger,
    clock: C,
}

impl LedgerMarket<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(EngineConfig::default(), SystemClock)
    }
}

impl Default for LedgerMarket<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> LedgerMarket<C> {
    pub fn with_clock(config: EngineConfig, clock: C) -> Self {
        Self {
            engine: MatchingEngine::with_config(config),
            ledger: InternalLedger::new(),
            clock,
        }
    }

    /// Place a limit order on behalf of `caller`
    ///
    /// The request's owner is overwritten with the caller, so nobody can
    /// place orders against someone else's balance.
    pub fn limit_order(
        &mut self,
        caller: AccountId,
        request: OrderRequest,
    ) -> Result<SubmitOutcome, EngineError> {
        let request = OrderRequest {
            owner: caller,
            ..request
        };
        let now = self.clock.now();
        self.engine.submit(&mut self.ledger, request, now)
    }

    /// Cancel one of `caller`'s open orders
    pub fn cancel_order(&mut self, caller: AccountId, uid: OrderUid) -> Result<OrderEvent, EngineError> {
        self.engine.cancel(&mut self.ledger, uid, caller)
    }

    pub fn engine(&self) -> &MatchingEngine {
        &self.engine
    }

    pub fn ledger(&self) -> &InternalLedger {
        &self.ledger
    }

    /// Mutable ledger access for deposits
    pub fn ledger_mut(&mut self) -> &mut InternalLedger {
        &mut self.ledger
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
