//! Contract-specific error types
//!
//! Error taxonomy for token, vault and exchange operations. A failed call
//! leaves contract state exactly as it was.

use thiserror::Error;
use types::errors::EngineError;
use types::numeric::Amount;

/// Vault-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("Vault is paused")]
    Paused,

    #[error("Reentrancy detected")]
    Reentrancy,

    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: Amount, available: Amount },

    #[error("Unauthorized: caller lacks the required role")]
    Unauthorized,

    #[error("Deposit amount must be positive")]
    InvalidAmount,

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,
}

/// Token-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Must have enough funds to transfer")]
    InsufficientFunds { required: Amount, available: Amount },

    #[error("Allowance exceeded: required {required}, approved {approved}")]
    InsufficientAllowance { required: Amount, approved: Amount },

    #[error("Arithmetic overflow in supply calculation")]
    Overflow,
}

/// Exchange-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("{0}")]
    Engine(#[from] EngineError),
}
