//! One side of the book (bids or asks)
//!
//! Three disjoint sequences of handles, each in arrival order. Entries only
//! ever move out of `open`, and removal from `open` is stable so the
//! remaining open orders keep their time priority.

use types::order::OrderState;

use super::arena::OrderHandle;

/// Sequence selector for read-only views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sequence {
    Open,
    Closed,
    Canceled,
}

impl From<OrderState> for Sequence {
    fn from(state: OrderState) -> Self {
        match state {
            OrderState::Open => Sequence::Open,
            OrderState::Closed => Sequence::Closed,
            OrderState::Canceled => Sequence::Canceled,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SideBook {
    open: Vec<OrderHandle>,
    closed: Vec<OrderHandle>,
    canceled: Vec<OrderHandle>,
}

impl SideBook {
    pub fn new() -> Self {
        Self {
            open: Vec::new(),
            closed: Vec::new(),
            canceled: Vec::new(),
        }
    }

    pub fn handles(&self, sequence: Sequence) -> &[OrderHandle] {
        match sequence {
            Sequence::Open => &self.open,
            Sequence::Closed => &self.closed,
            Sequence::Canceled => &self.canceled,
        }
    }

    pub fn len(&self, sequence: Sequence) -> usize {
        self.handles(sequence).len()
    }

    pub fn get(&self, sequence: Sequence, index: usize) -> Option<OrderHandle> {
        self.handles(sequence).get(index).copied()
    }

    /// Append to the sequence matching `state`
    pub(crate) fn push(&mut self, state: OrderState, handle: OrderHandle) {
        match state {
            OrderState::Open => self.open.push(handle),
            OrderState::Closed => self.closed.push(handle),
            OrderState::Canceled => self.canceled.push(handle),
        }
    }

    /// Move the open entry at `index` to the terminal sequence for `state`
    ///
    /// # Panics
    /// Panics if `state` is not terminal or `index` is out of bounds
    pub(crate) fn retire_open(&mut self, index: usize, state: OrderState) -> OrderHandle {
        assert!(state.is_terminal(), "Open orders can only move to a terminal sequence");
        let handle = self.open.remove(index);
        self.push(state, handle);
        handle
    }
}
