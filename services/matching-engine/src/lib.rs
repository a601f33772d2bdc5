//! Matching Engine Service
//!
//! Single-market limit order matching with time priority: an incoming order
//! is matched against the opposite side's open orders in arrival order, and
//! every execution happens at the resting order's price.
//!
//! **Key Invariants:**
//! - Escrow locked for an open order always equals what it can still trade
//! - Deterministic matching (same inputs → same outputs)
//! - Closed and canceled orders never change again
//! - Conservation of asset and currency across every submission
//!
//! The engine owns no balances. Hosts plug in a [`Settlement`] adapter; an
//! in-memory one ships as [`InternalLedger`] and [`LedgerMarket`] wires it to
//! a clock.

pub mod book;
pub mod clock;
pub mod config;
pub mod engine;
pub mod events;
pub mod expiry;
pub mod ledger;
pub mod market;
pub mod matching;
pub mod settlement;

pub use book::{OrderBook, OrderHandle, Sequence};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use engine::{MatchingEngine, OrderRequest, SubmitOutcome, SubmitStatus};
pub use events::{CancelReason, EventJournal, JournalEntry, OrderEvent};
pub use ledger::{InternalLedger, LedgerError};
pub use market::LedgerMarket;
pub use settlement::Settlement;
