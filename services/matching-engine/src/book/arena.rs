//! Order storage with stable handles
//!
//! Every order the engine ever accepted lives here for the lifetime of the
//! engine. Side sequences refer to orders by `OrderHandle`, so moving an order
//! between sequences never invalidates other handles.

use types::order::Order;

/// Stable reference to an order in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderHandle(usize);

/// Append-only order store
#[derive(Debug, Clone, Default)]
pub struct OrderArena {
    orders: Vec<Order>,
}

impl OrderArena {
    pub fn new() -> Self {
        Self { orders: Vec::new() }
    }

    /// Store an order and return its handle
    pub fn insert(&mut self, order: Order) -> OrderHandle {
        self.orders.push(order);
        OrderHandle(self.orders.len() - 1)
    }

    /// Handles are only minted by `insert`, so indexing cannot go out of bounds
    pub fn get(&self, handle: OrderHandle) -> &Order {
        &self.orders[handle.0]
    }

    pub fn get_mut(&mut self, handle: OrderHandle) -> &mut Order {
        &mut self.orders[handle.0]
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
