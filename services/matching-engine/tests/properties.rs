//! Property tests over random order flow
//!
//! Random submissions, cancellations and clock advances are applied to a
//! `LedgerMarket`; after every step the book and the ledger must agree.

use std::collections::HashMap;

use matching_engine::{Clock, EngineConfig, LedgerMarket, ManualClock, OrderEvent, OrderRequest, Sequence};
use proptest::prelude::*;
use types::account::Holding;
use types::ids::{AccountId, OrderUid};
use types::numeric::{Amount, Price, Quantity};
use types::order::{Order, OrderFlags, Side};
use types::trade::Fill;

const START: i64 = 1_708_123_456;
const FUNDING: u128 = 1_000_000;
const TRADERS: usize = 4;

#[derive(Debug, Clone)]
enum Step {
    Submit {
        trader: usize,
        side: Side,
        price: u64,
        quantity: u64,
        flags: OrderFlags,
        ttl: i64,
    },
    Cancel {
        trader: usize,
        uid: u64,
    },
    Advance(i64),
}

fn side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Bid), Just(Side::Ask)]
}

fn flags() -> impl Strategy<Value = OrderFlags> {
    prop_oneof![
        Just(OrderFlags::GoodTillCancel),
        Just(OrderFlags::ImmediateOrCancel),
        Just(OrderFlags::TimeInForce),
    ]
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => (0..TRADERS, side(), 5u64..15, 1u64..40, flags(), 0i64..120).prop_map(
            |(trader, side, price, quantity, flags, ttl)| Step::Submit {
                trader,
                side,
                price,
                quantity,
                flags,
                ttl,
            }
        ),
        2 => (0..TRADERS, 1u64..40).prop_map(|(trader, uid)| Step::Cancel { trader, uid }),
        1 => (1i64..90).prop_map(Step::Advance),
    ]
}

struct Harness {
    market: LedgerMarket<ManualClock>,
    traders: Vec<AccountId>,
    next_uid: u64,
    /// Every fill and lifecycle event produced so far, in order
    fills: Vec<Fill>,
    events: Vec<OrderEvent>,
}

impl Harness {
    fn new() -> Self {
        let mut market = LedgerMarket::with_clock(EngineConfig::default(), ManualClock::new(START));
        let traders: Vec<AccountId> = (0..TRADERS).map(|_| AccountId::new()).collect();
        for trader in &traders {
            let ledger = market.ledger_mut();
            ledger.deposit_asset(*trader, Amount::new(FUNDING)).unwrap();
            ledger.deposit_currency(*trader, Amount::new(FUNDING)).unwrap();
        }
        Self {
            market,
            traders,
            next_uid: 1,
            fills: Vec::new(),
            events: Vec::new(),
        }
    }

    fn apply(&mut self, step: &Step) {
        match *step {
            Step::Submit {
                trader,
                side,
                price,
                quantity,
                flags,
                ttl,
            } => {
                let good_till = match flags {
                    OrderFlags::TimeInForce if ttl > 0 => self.market.clock().now() + ttl,
                    _ => 0,
                };
                let owner = self.traders[trader];
                let request = OrderRequest::new(
                    self.next_uid,
                    owner,
                    side,
                    Price::new(price),
                    Quantity::new(quantity),
                    flags,
                    good_till,
                );
                self.next_uid += 1;
                // Rejections are legal outcomes; invariants must hold either way
                if let Ok(outcome) = self.market.limit_order(owner, request) {
                    self.fills.extend(outcome.fills);
                    self.events.extend(outcome.events);
                }
            }
            Step::Cancel { trader, uid } => {
                if let Ok(event) = self.market.cancel_order(self.traders[trader], OrderUid::new(uid)) {
                    self.events.push(event);
                }
            }
            Step::Advance(seconds) => self.market.clock().advance(seconds),
        }
    }

    fn terminal_orders(&self) -> Vec<Order> {
        let engine = self.market.engine();
        [Side::Bid, Side::Ask]
            .into_iter()
            .flat_map(|side| {
                engine
                    .orders(side, Sequence::Closed)
                    .chain(engine.orders(side, Sequence::Canceled))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn all_orders(&self) -> Vec<Order> {
        let engine = self.market.engine();
        [Side::Bid, Side::Ask]
            .into_iter()
            .flat_map(|side| {
                [Sequence::Open, Sequence::Closed, Sequence::Canceled]
                    .into_iter()
                    .flat_map(move |sequence| engine.orders(side, sequence).cloned().collect::<Vec<_>>())
            })
            .collect()
    }

    fn holdings_total(&self, holding: Holding) -> Amount {
        self.traders.iter().fold(Amount::ZERO, |total, trader| {
            total.saturating_add(self.market.ledger().balance(*trader, holding).total)
        })
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn fuzz_value_is_conserved(steps in prop::collection::vec(step(), 1..80)) {
        let mut harness = Harness::new();
        let supply = Amount::new(FUNDING * TRADERS as u128);

        for step in &steps {
            harness.apply(step);
            prop_assert_eq!(harness.holdings_total(Holding::Asset), supply);
            prop_assert_eq!(harness.holdings_total(Holding::Currency), supply);
        }
    }

    #[test]
    fn fuzz_escrow_matches_open_orders(steps in prop::collection::vec(step(), 1..80)) {
        let mut harness = Harness::new();

        for step in &steps {
            harness.apply(step);
            let engine = harness.market.engine();
            let ledger = harness.market.ledger();
            prop_assert_eq!(ledger.total_locked(Holding::Currency), engine.open_escrow(Side::Bid));
            prop_assert_eq!(ledger.total_locked(Holding::Asset), engine.open_escrow(Side::Ask));
        }
    }

    #[test]
    fn fuzz_order_invariants_hold(steps in prop::collection::vec(step(), 1..80)) {
        let mut harness = Harness::new();

        for step in &steps {
            harness.apply(step);
            let engine = harness.market.engine();
            let mut listed = 0;
            for side in [Side::Bid, Side::Ask] {
                for sequence in [Sequence::Open, Sequence::Closed, Sequence::Canceled] {
                    for order in engine.orders(side, sequence) {
                        prop_assert!(order.check_invariant(), "Broken order {:?}", order);
                        prop_assert_eq!(order.side, side);
                        prop_assert_eq!(Sequence::from(order.state), sequence);
                        listed += 1;
                    }
                }
            }
            prop_assert_eq!(listed, engine.book().total_orders());
        }
    }

    #[test]
    fn fuzz_terminal_orders_never_change(steps in prop::collection::vec(step(), 1..80)) {
        let mut harness = Harness::new();
        let mut seen: Vec<Order> = Vec::new();

        for step in &steps {
            harness.apply(step);
            let terminal = harness.terminal_orders();
            for order in &seen {
                prop_assert!(terminal.contains(order), "Terminal order changed: {:?}", order);
            }
            seen = terminal;
        }
    }

    #[test]
    fn fuzz_fills_credit_the_right_orders(steps in prop::collection::vec(step(), 1..80)) {
        let mut harness = Harness::new();
        for step in &steps {
            harness.apply(step);
        }

        let mut bought: HashMap<OrderUid, Quantity> = HashMap::new();
        let mut sold: HashMap<OrderUid, Quantity> = HashMap::new();
        for fill in &harness.fills {
            let bid = bought.entry(fill.bid_uid()).or_insert(Quantity::zero());
            *bid = *bid + fill.quantity;
            let ask = sold.entry(fill.ask_uid()).or_insert(Quantity::zero());
            *ask = *ask + fill.quantity;
        }

        for order in harness.all_orders() {
            let filled = match order.side {
                Side::Bid => bought.remove(&order.uid),
                Side::Ask => sold.remove(&order.uid),
            }
            .unwrap_or(Quantity::zero());
            prop_assert_eq!(filled, order.filled_quantity(), "Fills misattributed for {:?}", order);
        }
        prop_assert!(bought.is_empty(), "Fills for unknown bids: {:?}", bought);
        prop_assert!(sold.is_empty(), "Fills for unknown asks: {:?}", sold);

        for fill in &harness.fills {
            let owners: Vec<AccountId> = harness
                .all_orders()
                .into_iter()
                .filter(|order| {
                    (order.side == Side::Bid && order.uid == fill.bid_uid())
                        || (order.side == Side::Ask && order.uid == fill.ask_uid())
                })
                .map(|order| order.owner)
                .collect();
            prop_assert!(owners.contains(&fill.bid_owner));
            prop_assert!(owners.contains(&fill.ask_owner));
        }
    }

    #[test]
    fn fuzz_terminal_event_emitted_once(steps in prop::collection::vec(step(), 1..80)) {
        let mut harness = Harness::new();
        for step in &steps {
            harness.apply(step);
        }

        let mut terminal_events: HashMap<OrderUid, usize> = HashMap::new();
        for event in &harness.events {
            *terminal_events.entry(event.uid()).or_default() += 1;
        }
        for (uid, count) in &terminal_events {
            prop_assert_eq!(*count, 1, "Order {:?} retired more than once", uid);
        }

        let retired = harness.terminal_orders();
        prop_assert_eq!(terminal_events.len(), retired.len());
        for order in &retired {
            prop_assert!(terminal_events.contains_key(&order.uid), "No event for {:?}", order);
        }
    }

    #[test]
    fn fuzz_fills_execute_at_resting_price(
        resting_price in 5u64..15,
        incoming_price in 5u64..15,
        quantity in 1u64..40,
        incoming_side in side(),
    ) {
        let mut harness = Harness::new();
        let maker = harness.traders[0];
        let taker = harness.traders[1];

        let resting = OrderRequest::new(
            1u64,
            maker,
            incoming_side.opposite(),
            Price::new(resting_price),
            Quantity::new(quantity),
            OrderFlags::GoodTillCancel,
            0,
        );
        harness.market.limit_order(maker, resting).unwrap();
        let incoming = OrderRequest::new(
            2u64,
            taker,
            incoming_side,
            Price::new(incoming_price),
            Quantity::new(quantity),
            OrderFlags::GoodTillCancel,
            0,
        );
        let outcome = harness.market.limit_order(taker, incoming).unwrap();

        for fill in &outcome.fills {
            prop_assert_eq!(fill.price, Price::new(resting_price));
            prop_assert_eq!(fill.notional, Price::new(resting_price).notional(fill.quantity));
        }
    }
}
