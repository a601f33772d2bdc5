//! Crossing detection logic
//!
//! Determines when a bid and ask can match based on price compatibility

use types::numeric::Price;
use types::order::Side;

/// Check if a bid and ask can match at given prices
///
/// A bid crosses an ask when the bid price is at least the ask price.
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Check if an incoming order can match against a resting order
pub fn incoming_can_match(incoming_side: Side, incoming_price: Price, resting_price: Price) -> bool {
    match incoming_side {
        Side::Bid => can_match(incoming_price, resting_price),
        Side::Ask => can_match(resting_price, incoming_price),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_match_crossing() {
        assert!(can_match(Price::new(10), Price::new(9)), "Bid >= ask should match");
    }

    #[test]
    fn test_can_match_exact() {
        let price = Price::new(10);
        assert!(can_match(price, price), "Equal prices should match");
    }

    #[test]
    fn test_can_match_no_cross() {
        assert!(!can_match(Price::new(10), Price::new(11)), "Bid < ask should not match");
    }

    #[test]
    fn test_incoming_bid_can_match() {
        assert!(incoming_can_match(Side::Bid, Price::new(10), Price::new(9)));
        assert!(!incoming_can_match(Side::Bid, Price::new(10), Price::new(11)));
    }

    #[test]
    fn test_incoming_ask_can_match() {
        assert!(incoming_can_match(Side::Ask, Price::new(9), Price::new(10)));
        assert!(!incoming_can_match(Side::Ask, Price::new(11), Price::new(10)));
    }
}
