//! Both sides of the book over a shared order arena

use types::ids::{AccountId, OrderUid};
use types::order::{Order, OrderState, Side};

use super::arena::{OrderArena, OrderHandle};
use super::side_book::{Sequence, SideBook};

/// Bids and asks with their open, closed and canceled sequences
#[derive(Debug, Clone)]
pub struct OrderBook {
    arena: OrderArena,
    bids: SideBook,
    asks: SideBook,
}

impl OrderBook {
    pub fn new() -> Self {
        Self {
            arena: OrderArena::new(),
            bids: SideBook::new(),
            asks: SideBook::new(),
        }
    }

    pub fn side(&self, side: Side) -> &SideBook {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideBook {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    pub fn order(&self, handle: OrderHandle) -> &Order {
        self.arena.get(handle)
    }

    pub(crate) fn order_mut(&mut self, handle: OrderHandle) -> &mut Order {
        self.arena.get_mut(handle)
    }

    pub fn count(&self, side: Side, sequence: Sequence) -> usize {
        self.side(side).len(sequence)
    }

    /// Indexed lookup into one sequence of one side
    pub fn get(&self, side: Side, sequence: Sequence, index: usize) -> Option<&Order> {
        self.side(side)
            .get(sequence, index)
            .map(|handle| self.arena.get(handle))
    }

    pub fn iter(&self, side: Side, sequence: Sequence) -> impl Iterator<Item = &Order> + '_ {
        self.side(side)
            .handles(sequence)
            .iter()
            .map(move |handle| self.arena.get(*handle))
    }

    pub(crate) fn open_handle(&self, side: Side, index: usize) -> Option<OrderHandle> {
        self.side(side).get(Sequence::Open, index)
    }

    /// Store an order in the sequence its state names
    pub(crate) fn record(&mut self, order: Order) -> OrderHandle {
        let side = order.side;
        let state = order.state;
        let handle = self.arena.insert(order);
        self.side_mut(side).push(state, handle);
        handle
    }

    /// Move the open order at `index` on `side` to `state` and return it
    pub(crate) fn retire_open(&mut self, side: Side, index: usize, state: OrderState) -> &Order {
        let handle = self.side_mut(side).retire_open(index, state);
        let order = self.arena.get_mut(handle);
        order.state = state;
        order
    }

    /// Locate an open order by uid and owner, bids first, in arrival order
    pub fn find_open(&self, uid: OrderUid, owner: AccountId) -> Option<(Side, usize)> {
        [Side::Bid, Side::Ask].into_iter().find_map(|side| {
            self.iter(side, Sequence::Open)
                .position(|order| order.uid == uid && order.owner == owner)
                .map(|index| (side, index))
        })
    }

    /// Total number of orders ever recorded
    pub fn total_orders(&self) -> usize {
        self.arena.len()
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}
