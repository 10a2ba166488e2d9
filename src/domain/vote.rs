use serde::{Deserialize, Serialize};

/// A vote event as recorded on the ledger. Not a standalone stored entity;
/// the ledger enforces one vote per `(poll_id, voter)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub poll_id: u64,
    pub option_id: u64,
    pub voter: String,
}

/// Per-option tallies for one poll, re-derived from the ledger's vote events
/// at read time. Never cached by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollResults {
    pub poll_id: u64,
    pub counts: Vec<u64>,
}

impl PollResults {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}
