//! Lazy expiry of TimeInForce orders
//!
//! There is no timer. Every submission first sweeps both sides of the book
//! and cancels the open orders whose deadline has passed, so an expired order
//! stays visibly open until the next submission arrives.

use tracing::info;
use types::order::{OrderState, Side};

use crate::book::OrderBook;
use crate::events::{CancelReason, OrderEvent};
use crate::settlement::Settlement;

/// Cancel every open order expired at `now`, bids first, in arrival order
///
/// Escrow is released to each owner and one `OrderCanceled` event is pushed
/// per retired order. Returns the number of orders retired.
pub fn sweep_expired<S: Settlement>(
    book: &mut OrderBook,
    settlement: &mut S,
    now: i64,
    events: &mut Vec<OrderEvent>,
) -> usize {
    let mut retired = 0;

    for side in [Side::Bid, Side::Ask] {
        let mut index = 0;
        while let Some(handle) = book.open_handle(side, index) {
            if !book.order(handle).is_expired(now) {
                index += 1;
                continue;
            }
            // The next open order shifts into `index`
            let order = book.retire_open(side, index, OrderState::Canceled);
            settlement.release_remaining(order);
            events.push(OrderEvent::canceled(order.uid, CancelReason::Expired));
            retired += 1;
        }
    }

    if retired > 0 {
        info!(retired, now, "Expired orders swept");
    }

    retired
}
