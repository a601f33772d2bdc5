//! Matching logic module
//!
//! Time-priority matching: crossing checks and fill execution

pub mod crossing;
pub mod executor;

pub use crossing::{can_match, incoming_can_match};
pub use executor::MatchExecutor;
