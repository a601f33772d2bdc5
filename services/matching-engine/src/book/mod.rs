//! Order book infrastructure module
//!
//! Contains the order arena, the per-side open/closed/canceled sequences,
//! and the two-sided book that ties them together.

pub mod arena;
pub mod side_book;
pub mod order_book;

pub use arena::{OrderArena, OrderHandle};
pub use side_book::{Sequence, SideBook};
pub use order_book::OrderBook;
