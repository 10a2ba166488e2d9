use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{Organization, PollSummary};
use crate::error::LedgerError;

/// Revert reason strings used by the deployed voting contract. The contract
/// reports these as opaque text, not a designed API; the in-memory ledger
/// mirrors them and the coordinator's classification table matches on them.
pub mod revert {
    pub const ORGANIZATION_NOT_FOUND: &str = "Organization does not exist";
    pub const POLL_NOT_FOUND: &str = "Poll does not exist";
    pub const INVALID_OPTION: &str = "Invalid option";
    pub const VOTING_NOT_STARTED: &str = "Voting has not started";
    pub const VOTING_ENDED: &str = "Voting has ended";
    pub const ALREADY_VOTED: &str = "Already voted";
}

/// Identifier the ledger assigns to a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub String);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A state-changing call the gateway can submit to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    CreateOrganization {
        name: String,
    },
    CreatePoll {
        org_id: u64,
        title: String,
        description: String,
        options: Vec<String>,
        image_hashes: Vec<String>,
        start_time: i64,
        end_time: i64,
    },
    Vote {
        poll_id: u64,
        option_id: u64,
    },
}

impl LedgerCall {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateOrganization { .. } => "createOrganization",
            Self::CreatePoll { .. } => "createPoll",
            Self::Vote { .. } => "vote",
        }
    }
}

/// Events the contract emits when a transaction is included in a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    OrganizationCreated { org_id: u64, name: String },
    PollCreated { poll_id: u64, org_id: u64, title: String },
    Voted { poll_id: u64, option_id: u64, voter: String },
}

/// Where a submitted transaction currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationStatus {
    Pending,
    Confirmed,
    Rejected,
}

/// One ledger answer to "what happened to this transaction?".
#[derive(Debug, Clone)]
pub struct ConfirmationReport {
    pub status: ConfirmationStatus,
    /// Present only once confirmed
    pub block_reference: Option<String>,
    /// Raw reason text, present only on rejection
    pub rejection_reason: Option<String>,
    /// Decoded contract events, present only once confirmed
    pub events: Vec<LedgerEvent>,
}

impl ConfirmationReport {
    pub fn pending() -> Self {
        Self {
            status: ConfirmationStatus::Pending,
            block_reference: None,
            rejection_reason: None,
            events: Vec::new(),
        }
    }

    pub fn confirmed(block_reference: Option<String>, events: Vec<LedgerEvent>) -> Self {
        Self {
            status: ConfirmationStatus::Confirmed,
            block_reference,
            rejection_reason: None,
            events,
        }
    }

    pub fn rejected(reason: String) -> Self {
        Self {
            status: ConfirmationStatus::Rejected,
            block_reference: None,
            rejection_reason: Some(reason),
            events: Vec::new(),
        }
    }
}

/// Capability to submit signed transactions to and read state from the
/// ledger. Implementations must tolerate concurrent use from multiple
/// in-flight operations without external locking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submit a transaction; returns as soon as the ledger has accepted it
    /// for inclusion. A `Rejected` error here means the ledger refused the
    /// call outright (e.g. a revert detected during submission).
    async fn submit(&self, call: LedgerCall) -> Result<TransactionId, LedgerError>;

    /// Report the current confirmation state of a submitted transaction.
    async fn confirmation(&self, tx_id: &TransactionId) -> Result<ConfirmationReport, LedgerError>;

    async fn organization(&self, org_id: u64) -> Result<Option<Organization>, LedgerError>;

    async fn poll(&self, poll_id: u64) -> Result<Option<PollSummary>, LedgerError>;

    /// Ordered per-option vote counts, or `None` if the poll does not exist.
    async fn poll_results(&self, poll_id: u64) -> Result<Option<Vec<u64>>, LedgerError>;

    fn is_dry_run(&self) -> bool {
        false
    }
}
