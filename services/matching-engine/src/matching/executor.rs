//! Fill execution
//!
//! Turns one crossing into a `Fill` and asks the settlement adapter to move
//! the value. Executions happen at the resting order's price; when an
//! incoming bid trades below its own limit, the escrow it no longer needs is
//! released back to the bidder in the same step.

use tracing::debug;
use types::numeric::Quantity;
use types::order::{Order, Side};
use types::trade::Fill;

use crate::settlement::Settlement;

/// Fill executor with sequence generation
#[derive(Debug, Clone)]
pub struct MatchExecutor {
    sequence_counter: u64,
}

impl MatchExecutor {
    /// Create a new match executor with starting sequence number
    pub fn new(starting_sequence: u64) -> Self {
        Self {
            sequence_counter: starting_sequence,
        }
    }

    /// Get next sequence number (monotonically increasing)
    fn next_sequence(&mut self) -> u64 {
        let seq = self.sequence_counter;
        self.sequence_counter += 1;
        seq
    }

    /// Settle `quantity` between an incoming order and a resting order
    ///
    /// The caller guarantees the orders are on opposite sides, cross, and that
    /// `quantity` does not exceed either remaining quantity.
    pub fn execute<S: Settlement>(
        &mut self,
        settlement: &mut S,
        incoming: &Order,
        resting: &Order,
        quantity: Quantity,
        timestamp: i64,
    ) -> Fill {
        let (bid, ask) = match incoming.side {
            Side::Bid => (incoming, resting),
            Side::Ask => (resting, incoming),
        };
        let price = resting.price;
        let notional = price.notional(quantity);

        settlement.transfer_asset(ask.owner, bid.owner, quantity.as_amount());
        settlement.transfer_currency(bid.owner, ask.owner, notional);

        // Bid escrow was locked at the bid's own price
        let improvement = bid.escrow_for(quantity).saturating_sub(notional);
        if !improvement.is_zero() {
            settlement.release_currency(bid.owner, improvement);
        }

        let fill = Fill::new(
            self.next_sequence(),
            resting.uid,
            incoming.uid,
            incoming.side,
            bid.owner,
            ask.owner,
            price,
            quantity,
            timestamp,
        );

        debug!(
            sequence = fill.sequence,
            maker = %fill.maker_uid,
            taker = %fill.taker_uid,
            price = %fill.price,
            quantity = %fill.quantity,
            "Fill executed"
        );

        fill
    }
}

impl Default for MatchExecutor {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::errors::SettlementError;
    use types::ids::{AccountId, OrderUid};
    use types::numeric::{Amount, Price};
    use types::order::OrderFlags;

    #[derive(Debug, PartialEq)]
    enum Call {
        ReleaseCurrency(AccountId, Amount),
        TransferCurrency(AccountId, AccountId, Amount),
        TransferAsset(AccountId, AccountId, Amount),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Settlement for Recorder {
        fn escrow_currency(&mut self, _: AccountId, _: Amount) -> Result<(), SettlementError> {
            Ok(())
        }
        fn escrow_asset(&mut self, _: AccountId, _: Amount) -> Result<(), SettlementError> {
            Ok(())
        }
        fn release_currency(&mut self, owner: AccountId, amount: Amount) {
            self.calls.push(Call::ReleaseCurrency(owner, amount));
        }
        fn release_asset(&mut self, _: AccountId, _: Amount) {}
        fn transfer_currency(&mut self, from: AccountId, to: AccountId, amount: Amount) {
            self.calls.push(Call::TransferCurrency(from, to, amount));
        }
        fn transfer_asset(&mut self, from: AccountId, to: AccountId, amount: Amount) {
            self.calls.push(Call::TransferAsset(from, to, amount));
        }
    }

    fn order(uid: u64, side: Side, price: u64, qty: u64) -> Order {
        Order::new(
            OrderUid::new(uid),
            AccountId::new(),
            side,
            Price::new(price),
            Quantity::new(qty),
            OrderFlags::GoodTillCancel,
            0,
        )
    }

    #[test]
    fn test_execute_at_resting_price() {
        let mut executor = MatchExecutor::new(1000);
        let mut settlement = Recorder::default();
        let ask = order(1, Side::Ask, 9, 20);
        let bid = order(2, Side::Bid, 10, 20);

        let fill = executor.execute(&mut settlement, &bid, &ask, Quantity::new(20), 1);

        assert_eq!(fill.sequence, 1000);
        assert_eq!(fill.price, Price::new(9));
        assert_eq!(fill.notional, Amount::new(180));
        assert_eq!(
            settlement.calls,
            vec![
                Call::TransferAsset(ask.owner, bid.owner, Amount::new(20)),
                Call::TransferCurrency(bid.owner, ask.owner, Amount::new(180)),
                Call::ReleaseCurrency(bid.owner, Amount::new(20)),
            ]
        );
    }

    #[test]
    fn test_incoming_ask_gets_resting_bid_price() {
        let mut executor = MatchExecutor::new(0);
        let mut settlement = Recorder::default();
        let bid = order(1, Side::Bid, 12, 5);
        let ask = order(2, Side::Ask, 10, 5);

        let fill = executor.execute(&mut settlement, &ask, &bid, Quantity::new(5), 1);

        assert_eq!(fill.price, Price::new(12));
        assert_eq!(fill.bid_uid(), OrderUid::new(1));
        assert_eq!(
            settlement.calls,
            vec![
                Call::TransferAsset(ask.owner, bid.owner, Amount::new(5)),
                Call::TransferCurrency(bid.owner, ask.owner, Amount::new(60)),
            ]
        );
    }

    #[test]
    fn test_sequence_monotonic() {
        let mut executor = MatchExecutor::new(7);
        let mut settlement = Recorder::default();
        let ask = order(1, Side::Ask, 10, 20);
        let bid = order(2, Side::Bid, 10, 20);

        let first = executor.execute(&mut settlement, &bid, &ask, Quantity::new(5), 1);
        let second = executor.execute(&mut settlement, &bid, &ask, Quantity::new(5), 2);

        assert_eq!(first.sequence, 7);
        assert_eq!(second.sequence, 8);
    }
}
