//! Lifecycle events emitted by the engine
//!
//! Only terminal transitions are observable: an order resting in the book is
//! silent, closing or canceling it emits exactly one event.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use types::ids::OrderUid;

/// Why an order was canceled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancelReason {
    /// Owner called cancel
    Requested,
    /// Unmatched remainder of an ImmediateOrCancel order
    ImmediateOrCancel,
    /// TimeInForce deadline passed, found by the expiry sweep
    Expired,
}

/// Order lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum OrderEvent {
    /// Remaining quantity reached zero
    OrderClosed { uid: OrderUid },
    /// Order retired with quantity left
    OrderCanceled { uid: OrderUid, reason: CancelReason },
}

impl OrderEvent {
    pub fn closed(uid: OrderUid) -> Self {
        OrderEvent::OrderClosed { uid }
    }

    pub fn canceled(uid: OrderUid, reason: CancelReason) -> Self {
        OrderEvent::OrderCanceled { uid, reason }
    }

    /// Uid of the order the event is about
    pub fn uid(&self) -> OrderUid {
        match self {
            OrderEvent::OrderClosed { uid } | OrderEvent::OrderCanceled { uid, .. } => *uid,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, OrderEvent::OrderClosed { .. })
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, OrderEvent::OrderCanceled { .. })
    }
}

/// Event with its engine-wide position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub sequence: u64,
    pub event: OrderEvent,
}

/// Bounded append-only log of emitted events
///
/// When full the oldest entries are dropped; sequence numbers keep counting.
#[derive(Debug, Clone)]
pub struct EventJournal {
    entries: VecDeque<JournalEntry>,
    capacity: usize,
    next_sequence: u64,
}

impl EventJournal {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            next_sequence: 0,
        }
    }

    pub fn record(&mut self, events: &[OrderEvent]) {
        for event in events {
            let sequence = self.next_sequence;
            self.next_sequence += 1;
            if self.capacity == 0 {
                continue;
            }
            if self.entries.len() == self.capacity {
                self.entries.pop_front();
            }
            self.entries.push_back(JournalEntry {
                sequence,
                event: *event,
            });
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drain all entries (consume and clear)
    pub fn drain(&mut self) -> Vec<JournalEntry> {
        self.entries.drain(..).collect()
    }
}
