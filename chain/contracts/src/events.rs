//! Contract events
//!
//! Events are immutable records emitted by contract operations. Each
//! contract keeps its own append-only log.

use matching_engine::events::{CancelReason, OrderEvent};
use serde::{Deserialize, Serialize};
use types::ids::{AccountId, OrderUid};
use types::numeric::Amount;

/// Native currency credited to a vault wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposited {
    pub account_id: AccountId,
    pub amount: Amount,
}

/// Native currency paid out of a vault wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawn {
    pub account_id: AccountId,
    pub amount: Amount,
}

/// Faucet mint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tapped {
    pub account_id: AccountId,
    pub amount: Amount,
}

/// Token balance moved between accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Amount,
}

/// Spending allowance set by an owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub owner: AccountId,
    pub spender: AccountId,
    pub amount: Amount,
}

/// Pause switch flipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseChanged {
    pub by: AccountId,
    pub paused: bool,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    Deposited(Deposited),
    Withdrawn(Withdrawn),
    Tapped(Tapped),
    Transfer(Transfer),
    Approval(Approval),
    PauseChanged(PauseChanged),
    OrderClosed { uid: OrderUid },
    OrderCanceled { uid: OrderUid, reason: CancelReason },
}

impl From<OrderEvent> for ContractEvent {
    fn from(event: OrderEvent) -> Self {
        match event {
            OrderEvent::OrderClosed { uid } => ContractEvent::OrderClosed { uid },
            OrderEvent::OrderCanceled { uid, reason } => ContractEvent::OrderCanceled { uid, reason },
        }
    }
}

impl ContractEvent {
    /// Uid of the order an order lifecycle event refers to
    pub fn order_uid(&self) -> Option<OrderUid> {
        match self {
            ContractEvent::OrderClosed { uid } | ContractEvent::OrderCanceled { uid, .. } => Some(*uid),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposited_serialization() {
        let event = Deposited {
            account_id: AccountId::new(),
            amount: Amount::new(200),
        };
        let json = serde_json::to_string(&event).unwrap();
        let deser: Deposited = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }

    #[test]
    fn test_order_event_conversion() {
        let event: ContractEvent =
            OrderEvent::canceled(OrderUid::new(1), CancelReason::ImmediateOrCancel).into();
        assert_eq!(
            event,
            ContractEvent::OrderCanceled {
                uid: OrderUid::new(1),
                reason: CancelReason::ImmediateOrCancel
            }
        );
        assert_eq!(event.order_uid(), Some(OrderUid::new(1)));
    }

    #[test]
    fn test_non_order_event_has_no_uid() {
        let event = ContractEvent::Tapped(Tapped {
            account_id: AccountId::new(),
            amount: Amount::new(100_000),
        });
        assert_eq!(event.order_uid(), None);
    }
}
