//! Types library for the limit-order matching engine
//!
//! Core type definitions shared by the engine and its host contexts
//! (self-custodial ledger, escrow-based exchange).
//!
//! # Modules
//! - `ids`: Identifiers (OrderUid, AccountId)
//! - `numeric`: Integer amounts (Price, Quantity, Amount)
//! - `order`: Order lifecycle types
//! - `trade`: Fill records
//! - `account`: Balance types
//! - `errors`: Error taxonomy

pub mod ids;
pub mod numeric;
pub mod order;
pub mod trade;
pub mod account;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::trade::*;
    pub use crate::account::*;
    pub use crate::errors::*;
}
