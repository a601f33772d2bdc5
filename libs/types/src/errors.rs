//! Error types for the matching engine
//!
//! Every variant is terminal: the operation that returns it has changed no
//! state, and the engine never retries internally.

use crate::account::Holding;
use crate::ids::OrderUid;
use crate::numeric::Amount;
use thiserror::Error;

/// Errors returned by `submit` and `cancel`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Insufficient funds: {holding} required {required}, available {available}")]
    InsufficientFunds {
        holding: Holding,
        required: Amount,
        available: Amount,
    },

    #[error("Order not found: {uid}")]
    OrderNotFound { uid: OrderUid },

    #[error("Invalid quantity: must be positive")]
    InvalidQuantity,

    #[error("Duplicate order uid: {uid}")]
    DuplicateOrder { uid: OrderUid },

    #[error("Settlement error: {0}")]
    Settlement(SettlementError),
}

impl From<SettlementError> for EngineError {
    fn from(err: SettlementError) -> Self {
        match err {
            SettlementError::InsufficientBalance {
                holding,
                required,
                available,
            } => EngineError::InsufficientFunds {
                holding,
                required,
                available,
            },
            other => EngineError::Settlement(other),
        }
    }
}

/// Errors a settlement adapter may report when locking escrow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    #[error("Insufficient {holding} balance: required {required}, available {available}")]
    InsufficientBalance {
        holding: Holding,
        required: Amount,
        available: Amount,
    },

    #[error("Settlement unavailable: {reason}")]
    Unavailable { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_not_found_display() {
        let err = EngineError::OrderNotFound {
            uid: OrderUid::new(100500),
        };
        assert_eq!(err.to_string(), "Order not found: 100500");
    }

    #[test]
    fn test_insufficient_balance_becomes_insufficient_funds() {
        let err: EngineError = SettlementError::InsufficientBalance {
            holding: Holding::Currency,
            required: Amount::new(200),
            available: Amount::new(150),
        }
        .into();

        assert_eq!(
            err,
            EngineError::InsufficientFunds {
                holding: Holding::Currency,
                required: Amount::new(200),
                available: Amount::new(150),
            }
        );
        assert!(err.to_string().contains("200"));
    }

    #[test]
    fn test_other_settlement_errors_are_wrapped() {
        let err: EngineError = SettlementError::Unavailable {
            reason: "paused".to_string(),
        }
        .into();
        assert!(matches!(err, EngineError::Settlement(_)));
    }
}
