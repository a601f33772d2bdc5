//! Escrow-Based Exchange Contracts
//!
//! Contract layer hosting the matching engine with external custody: a
//! fungible asset token, a native-currency vault, and the order book
//! exchange that escrows both.
//!
//! # Modules
//! - `events`: Contract events
//! - `errors`: Contract-specific error types
//! - `security`: Shared security primitives (reentrancy guard, access control, pause)
//! - `token`: ERC20-style asset token with a faucet
//! - `vault`: Native-currency wallets and bid escrow
//! - `exchange`: Limit order book exchange over the token and the vault

pub mod errors;
pub mod events;
pub mod exchange;
pub mod security;
pub mod token;
pub mod vault;

pub use exchange::EscrowExchange;
pub use token::{Token, TAP_AMOUNT};
pub use vault::Vault;
