use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use super::classify;
use crate::config::ExecutionConfig;
use crate::domain::{
    Organization, OrganizationDraft, PollDraft, PollResults, PollSummary,
};
use crate::error::{DomainError, LedgerError, Result};
use crate::ledger::{LedgerCall, LedgerClient, LedgerEvent, TransactionId};
use crate::tracker::{TransactionReceipt, TransactionTracker};

/// Outcome of a confirmed createOrganization transaction. The assigned id is
/// recovered from the creation event; when a node strips logs it can be
/// absent, in which case the caller falls back to a read.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizationCreation {
    pub organization_id: Option<u64>,
    pub transaction_id: TransactionId,
    pub block_reference: Option<String>,
}

/// Outcome of a confirmed createPoll transaction.
#[derive(Debug, Clone, Serialize)]
pub struct PollCreation {
    pub poll_id: Option<u64>,
    pub transaction_id: TransactionId,
    pub block_reference: Option<String>,
}

/// Outcome of a confirmed vote transaction.
#[derive(Debug, Clone, Serialize)]
pub struct VoteOutcome {
    pub poll_id: u64,
    pub option_id: u64,
    pub voter: Option<String>,
    pub transaction_id: TransactionId,
    pub block_reference: Option<String>,
}

/// The orchestration boundary: validates a request against domain rules,
/// submits the matching ledger call, drives it through the tracker, and maps
/// the outcome to a response or a classified error.
///
/// Stateless and restart-safe: the only thing it holds is the injected ledger
/// capability, shared read-only across concurrent operations. Every read
/// reflects the ledger at query time; every write's success is defined solely
/// by ledger confirmation. Nothing is retried; none of the writes are
/// idempotent, so resubmission is the caller's decision.
pub struct VotingCoordinator {
    ledger: Arc<dyn LedgerClient>,
    tracker: TransactionTracker,
    confirmation_timeout: Duration,
}

impl VotingCoordinator {
    pub fn new(ledger: Arc<dyn LedgerClient>, execution: &ExecutionConfig) -> Self {
        Self {
            tracker: TransactionTracker::new(ledger.clone(), execution.poll_interval()),
            ledger,
            confirmation_timeout: execution.confirmation_timeout(),
        }
    }

    async fn execute(
        &self,
        call: LedgerCall,
    ) -> std::result::Result<TransactionReceipt, LedgerError> {
        let tx_id = self.ledger.submit(call).await?;
        self.tracker
            .await_confirmation(tx_id, self.confirmation_timeout)
            .await
    }

    pub async fn create_organization(&self, name: &str) -> Result<OrganizationCreation> {
        let draft = OrganizationDraft::new(name)?;
        info!(name = %draft.name, "creating organization");
        let receipt = self
            .execute(LedgerCall::CreateOrganization { name: draft.name })
            .await?;
        let organization_id = receipt.events.iter().find_map(|e| match e {
            LedgerEvent::OrganizationCreated { org_id, .. } => Some(*org_id),
            _ => None,
        });
        if organization_id.is_none() {
            warn!(tx = %receipt.transaction_id, "confirmed without a creation event");
        }
        Ok(OrganizationCreation {
            organization_id,
            transaction_id: receipt.transaction_id,
            block_reference: receipt.block_reference,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_poll(
        &self,
        org_id: u64,
        title: &str,
        description: &str,
        options: Vec<String>,
        image_hashes: Vec<String>,
        start_time: i64,
        end_time: i64,
    ) -> Result<PollCreation> {
        let draft = PollDraft::new(
            org_id,
            title,
            description,
            options,
            image_hashes,
            start_time,
            end_time,
        )?;
        info!(org_id, title = %draft.title, "creating poll");
        let receipt = self
            .execute(LedgerCall::CreatePoll {
                org_id: draft.org_id,
                title: draft.title,
                description: draft.description,
                options: draft.options,
                image_hashes: draft.image_hashes,
                start_time: draft.start_time,
                end_time: draft.end_time,
            })
            .await
            .map_err(|e| match e {
                LedgerError::Rejected(reason) => classify::create_poll_rejection(org_id, &reason),
                other => other.into(),
            })?;
        let poll_id = receipt.events.iter().find_map(|e| match e {
            LedgerEvent::PollCreated { poll_id, .. } => Some(*poll_id),
            _ => None,
        });
        if poll_id.is_none() {
            warn!(tx = %receipt.transaction_id, "confirmed without a creation event");
        }
        Ok(PollCreation {
            poll_id,
            transaction_id: receipt.transaction_id,
            block_reference: receipt.block_reference,
        })
    }

    pub async fn vote(&self, poll_id: u64, option_id: u64) -> Result<VoteOutcome> {
        // No local checks beyond shape: the ledger is the sole authority on
        // option bounds, the voting window, and duplicate votes.
        info!(poll_id, option_id, "casting vote");
        let receipt = self
            .execute(LedgerCall::Vote { poll_id, option_id })
            .await
            .map_err(|e| match e {
                LedgerError::Rejected(reason) => {
                    classify::vote_rejection(poll_id, option_id, &reason)
                }
                other => other.into(),
            })?;
        let voter = receipt.events.iter().find_map(|e| match e {
            LedgerEvent::Voted { voter, .. } => Some(voter.clone()),
            _ => None,
        });
        Ok(VoteOutcome {
            poll_id,
            option_id,
            voter,
            transaction_id: receipt.transaction_id,
            block_reference: receipt.block_reference,
        })
    }

    /// Read-only: per-option vote counts, re-derived from the ledger on every
    /// call. No transaction, no tracker.
    pub async fn results(&self, poll_id: u64) -> Result<PollResults> {
        match self.ledger.poll_results(poll_id).await? {
            Some(counts) => Ok(PollResults { poll_id, counts }),
            None => Err(DomainError::PollNotFound(poll_id).into()),
        }
    }

    pub async fn organization(&self, org_id: u64) -> Result<Organization> {
        self.ledger
            .organization(org_id)
            .await?
            .ok_or_else(|| DomainError::OrganizationNotFound(org_id).into())
    }

    pub async fn poll(&self, poll_id: u64) -> Result<PollSummary> {
        self.ledger
            .poll(poll_id)
            .await?
            .ok_or_else(|| DomainError::PollNotFound(poll_id).into())
    }
}
