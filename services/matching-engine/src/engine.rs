//! Matching engine core
//!
//! Main coordinator for the order book, expiry, matching and cancellation.
//! Every operation takes `&mut self` and either applies completely or returns
//! an error before the first mutation.

use std::collections::HashSet;

use tracing::{debug, info, warn};
use types::errors::EngineError;
use types::ids::{AccountId, OrderUid};
use types::numeric::{Amount, Price, Quantity};
use types::order::{Order, OrderFlags, OrderState, Side};
use types::trade::Fill;

use crate::book::{OrderBook, Sequence};
use crate::config::EngineConfig;
use crate::events::{CancelReason, EventJournal, JournalEntry, OrderEvent};
use crate::expiry;
use crate::matching::{crossing, MatchExecutor};
use crate::settlement::{escrow_holding, Settlement};

/// A new limit order as submitted by its owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub uid: OrderUid,
    pub owner: AccountId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub flags: OrderFlags,
    /// Unix seconds; `0` means no expiry
    pub good_till: i64,
    /// Escrow the caller commits: currency for a bid, asset for an ask
    pub escrow: Amount,
}

impl OrderRequest {
    /// Build a request committing exactly the escrow it needs
    pub fn new(
        uid: impl Into<OrderUid>,
        owner: AccountId,
        side: Side,
        price: Price,
        quantity: Quantity,
        flags: OrderFlags,
        good_till: i64,
    ) -> Self {
        let escrow = required_escrow(side, price, quantity);
        Self {
            uid: uid.into(),
            owner,
            side,
            price,
            quantity,
            flags,
            good_till,
            escrow,
        }
    }

    /// Override the committed escrow
    pub fn with_escrow(mut self, escrow: Amount) -> Self {
        self.escrow = escrow;
        self
    }

    pub fn required_escrow(&self) -> Amount {
        required_escrow(self.side, self.price, self.quantity)
    }
}

/// Escrow an order of this shape needs: `price × quantity` currency for a bid,
/// `quantity` asset for an ask
pub fn required_escrow(side: Side, price: Price, quantity: Quantity) -> Amount {
    match side {
        Side::Bid => price.notional(quantity),
        Side::Ask => quantity.as_amount(),
    }
}

/// What happened to the incoming order once the scan ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    /// Fully filled, recorded directly as closed
    Closed,
    /// Remainder appended to the open sequence of its side
    Rested,
    /// ImmediateOrCancel remainder canceled
    Canceled,
}

/// Result of submitting an order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub status: SubmitStatus,
    /// Executions in scan order
    pub fills: Vec<Fill>,
    /// Lifecycle events in emission order (expiry cancellations first)
    pub events: Vec<OrderEvent>,
}

impl SubmitOutcome {
    pub fn filled_quantity(&self) -> Quantity {
        self.fills
            .iter()
            .fold(Quantity::zero(), |total, fill| total + fill.quantity)
    }
}

/// Main matching engine
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    book: OrderBook,
    executor: MatchExecutor,
    journal: EventJournal,
    /// (owner, uid) pairs accepted so far; only tracked when uniqueness is enforced
    accepted_uids: HashSet<(AccountId, OrderUid)>,
    config: EngineConfig,
}

impl MatchingEngine {
    /// Create a new matching engine with default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create a new matching engine with custom configuration
    pub fn with_config(config: EngineConfig) -> Self {
        info!(
            reject_duplicate_uids = config.reject_duplicate_uids,
            journal_capacity = config.journal_capacity,
            "MatchingEngine initialized"
        );

        Self {
            book: OrderBook::new(),
            executor: MatchExecutor::new(0),
            journal: EventJournal::new(config.journal_capacity),
            accepted_uids: HashSet::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Submit a limit order
    ///
    /// Validation and escrow happen first; any failure there leaves the book
    /// and the settlement adapter untouched. After that the expiry sweep runs,
    /// the opposite side is scanned in arrival order, and the incoming order
    /// ends up closed, resting or canceled.
    pub fn submit<S: Settlement>(
        &mut self,
        settlement: &mut S,
        request: OrderRequest,
        now: i64,
    ) -> Result<SubmitOutcome, EngineError> {
        self.validate(&request)?;

        let required = request.required_escrow();
        if request.escrow < required {
            warn!(
                uid = %request.uid,
                required = %required,
                committed = %request.escrow,
                "Order rejected: escrow below requirement"
            );
            return Err(EngineError::InsufficientFunds {
                holding: escrow_holding(request.side),
                required,
                available: request.escrow,
            });
        }

        if let Err(err) = settlement.escrow(request.side, request.owner, required) {
            warn!(uid = %request.uid, error = %err, "Order rejected: escrow failed");
            return Err(err.into());
        }

        if self.config.reject_duplicate_uids {
            self.accepted_uids.insert((request.owner, request.uid));
        }

        let mut events = Vec::new();
        expiry::sweep_expired(&mut self.book, settlement, now, &mut events);

        let mut incoming = Order::new(
            request.uid,
            request.owner,
            request.side,
            request.price,
            request.quantity,
            request.flags,
            request.good_till,
        );
        let fills = self.match_incoming(settlement, &mut incoming, now, &mut events);

        let status = if incoming.is_filled() {
            incoming.state = OrderState::Closed;
            events.push(OrderEvent::closed(incoming.uid));
            debug!(uid = %incoming.uid, "Incoming order closed");
            self.book.record(incoming);
            SubmitStatus::Closed
        } else if incoming.flags == OrderFlags::ImmediateOrCancel {
            settlement.release_remaining(&incoming);
            incoming.state = OrderState::Canceled;
            events.push(OrderEvent::canceled(incoming.uid, CancelReason::ImmediateOrCancel));
            debug!(uid = %incoming.uid, remaining = %incoming.quantity, "ImmediateOrCancel remainder canceled");
            self.book.record(incoming);
            SubmitStatus::Canceled
        } else {
            debug!(uid = %incoming.uid, remaining = %incoming.quantity, "Order rested");
            self.book.record(incoming);
            SubmitStatus::Rested
        };

        self.journal.record(&events);
        Ok(SubmitOutcome {
            status,
            fills,
            events,
        })
    }

    fn validate(&self, request: &OrderRequest) -> Result<(), EngineError> {
        if request.quantity.is_zero() {
            warn!(uid = %request.uid, "Order rejected: zero quantity");
            return Err(EngineError::InvalidQuantity);
        }
        if self.config.reject_duplicate_uids
            && self.accepted_uids.contains(&(request.owner, request.uid))
        {
            warn!(uid = %request.uid, owner = %request.owner, "Order rejected: duplicate uid");
            return Err(EngineError::DuplicateOrder { uid: request.uid });
        }
        Ok(())
    }

    /// Scan the opposite open sequence front to back and fill crossing orders
    ///
    /// Time priority only: a crossing order is taken even if a better price
    /// rests further back.
    fn match_incoming<S: Settlement>(
        &mut self,
        settlement: &mut S,
        incoming: &mut Order,
        now: i64,
        events: &mut Vec<OrderEvent>,
    ) -> Vec<Fill> {
        let opposite = incoming.side.opposite();
        let mut fills = Vec::new();
        let mut index = 0;

        while !incoming.is_filled() {
            let Some(handle) = self.book.open_handle(opposite, index) else {
                break;
            };
            let resting = self.book.order(handle);
            if !crossing::incoming_can_match(incoming.side, incoming.price, resting.price) {
                index += 1;
                continue;
            }

            let quantity = incoming.quantity.min(resting.quantity);
            let fill = self
                .executor
                .execute(settlement, incoming, resting, quantity, now);
            fills.push(fill);

            incoming.apply_fill(quantity);
            let resting = self.book.order_mut(handle);
            resting.apply_fill(quantity);

            if resting.is_filled() {
                // Removal shifts the next open order into `index`
                let closed = self.book.retire_open(opposite, index, OrderState::Closed);
                debug!(uid = %closed.uid, "Resting order closed");
                events.push(OrderEvent::closed(closed.uid));
            } else {
                index += 1;
            }
        }

        fills
    }

    /// Cancel the caller's open order with this uid
    ///
    /// Fails with `OrderNotFound`, changing nothing, when no open order with
    /// that uid belongs to `caller`.
    pub fn cancel<S: Settlement>(
        &mut self,
        settlement: &mut S,
        uid: OrderUid,
        caller: AccountId,
    ) -> Result<OrderEvent, EngineError> {
        let Some((side, index)) = self.book.find_open(uid, caller) else {
            warn!(uid = %uid, caller = %caller, "Cancel rejected: no such open order");
            return Err(EngineError::OrderNotFound { uid });
        };

        let order = self.book.retire_open(side, index, OrderState::Canceled);
        settlement.release_remaining(order);
        debug!(uid = %uid, remaining = %order.quantity, "Order canceled by owner");

        let event = OrderEvent::canceled(uid, CancelReason::Requested);
        self.journal.record(&[event]);
        Ok(event)
    }

    // ───────────────────────── Read-only views ─────────────────────────

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// Number of orders in one sequence of one side
    pub fn count(&self, side: Side, sequence: Sequence) -> usize {
        self.book.count(side, sequence)
    }

    /// Indexed lookup into one sequence of one side
    pub fn order_at(&self, side: Side, sequence: Sequence, index: usize) -> Option<&Order> {
        self.book.get(side, sequence, index)
    }

    pub fn orders(&self, side: Side, sequence: Sequence) -> impl Iterator<Item = &Order> + '_ {
        self.book.iter(side, sequence)
    }

    /// Open bid at `index`, in arrival order
    pub fn bids(&self, index: usize) -> Option<&Order> {
        self.order_at(Side::Bid, Sequence::Open, index)
    }

    /// Open ask at `index`, in arrival order
    pub fn asks(&self, index: usize) -> Option<&Order> {
        self.order_at(Side::Ask, Sequence::Open, index)
    }

    /// The caller's open order with this uid
    pub fn open_order(&self, uid: OrderUid, owner: AccountId) -> Option<&Order> {
        self.book
            .find_open(uid, owner)
            .and_then(|(side, index)| self.order_at(side, Sequence::Open, index))
    }

    /// Escrow currently backing all open orders on `side`
    pub fn open_escrow(&self, side: Side) -> Amount {
        self.orders(side, Sequence::Open)
            .fold(Amount::ZERO, |total, order| total.saturating_add(order.locked_escrow()))
    }

    // ───────────────────────── Events ─────────────────────────

    /// Journaled lifecycle events, oldest first
    pub fn events(&self) -> impl Iterator<Item = &JournalEntry> {
        self.journal.entries()
    }

    /// Drain the journal (consume and clear)
    pub fn drain_events(&mut self) -> Vec<JournalEntry> {
        self.journal.drain()
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}
