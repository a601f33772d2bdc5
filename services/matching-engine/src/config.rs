//! Engine configuration

use serde::{Deserialize, Serialize};

/// Matching engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Reject a submission whose (owner, uid) pair was accepted before
    pub reject_duplicate_uids: bool,
    /// Maximum number of lifecycle events kept in the journal (0 disables it)
    pub journal_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reject_duplicate_uids: false,
            journal_capacity: 10_000,
        }
    }
}
