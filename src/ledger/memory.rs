//! In-memory ledger used for dry-run mode and as the test double.
//!
//! Enforces the same rules as the on-chain voting contract (organization
//! existence, option bounds, voting window, one vote per voter per poll) and
//! reports rejections with the contract's revert strings, so the coordinator
//! classifies outcomes identically against either backend. Confirmation
//! latency is configurable to exercise the pending state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::RngCore;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use super::traits::{
    revert, ConfirmationReport, LedgerCall, LedgerClient, LedgerEvent, TransactionId,
};
use crate::domain::{Organization, Poll, PollSummary};
use crate::error::LedgerError;

const DEFAULT_SENDER: &str = "0x00000000000000000000000000000000000000a1";

#[derive(Clone)]
pub struct MemoryLedger {
    state: Arc<Mutex<LedgerState>>,
    sender: String,
    latency: Duration,
}

#[derive(Default)]
struct LedgerState {
    organizations: Vec<Organization>,
    polls: Vec<Poll>,
    /// Per-poll vote counts, aligned with `polls`
    counts: Vec<Vec<u64>>,
    /// Per-poll voter -> chosen option, aligned with `polls`
    voters: Vec<HashMap<String, u64>>,
    transactions: HashMap<String, TxRecord>,
    next_block: u64,
}

struct TxRecord {
    outcome: TxOutcome,
    ready_at: Instant,
}

enum TxOutcome {
    Confirmed {
        block_reference: String,
        events: Vec<LedgerEvent>,
    },
    Rejected {
        reason: String,
    },
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(LedgerState::default())),
            sender: DEFAULT_SENDER.to_string(),
            latency: Duration::ZERO,
        }
    }

    /// Delay between submission and the ledger reporting a final state.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Another handle on the same ledger, signing as a different account.
    pub fn as_sender(&self, sender: &str) -> Self {
        Self {
            state: self.state.clone(),
            sender: sender.to_string(),
            latency: self.latency,
        }
    }

    /// Number of transactions this ledger has ever accepted.
    pub async fn transaction_count(&self) -> usize {
        self.state.lock().await.transactions.len()
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerClient for MemoryLedger {
    async fn submit(&self, call: LedgerCall) -> Result<TransactionId, LedgerError> {
        let mut state = self.state.lock().await;
        let outcome = state.apply(&call, &self.sender);
        let tx_id = random_tx_id();
        debug!(tx = %tx_id, op = call.name(), "transaction accepted");
        state.transactions.insert(
            tx_id.clone(),
            TxRecord {
                outcome,
                ready_at: Instant::now() + self.latency,
            },
        );
        Ok(TransactionId(tx_id))
    }

    async fn confirmation(&self, tx_id: &TransactionId) -> Result<ConfirmationReport, LedgerError> {
        let state = self.state.lock().await;
        // An unknown hash looks exactly like a not-yet-included transaction.
        let Some(record) = state.transactions.get(&tx_id.0) else {
            return Ok(ConfirmationReport::pending());
        };
        if Instant::now() < record.ready_at {
            return Ok(ConfirmationReport::pending());
        }
        Ok(match &record.outcome {
            TxOutcome::Confirmed {
                block_reference,
                events,
            } => ConfirmationReport::confirmed(Some(block_reference.clone()), events.clone()),
            TxOutcome::Rejected { reason } => ConfirmationReport::rejected(reason.clone()),
        })
    }

    async fn organization(&self, org_id: u64) -> Result<Option<Organization>, LedgerError> {
        let state = self.state.lock().await;
        Ok(state.organization(org_id).cloned())
    }

    async fn poll(&self, poll_id: u64) -> Result<Option<PollSummary>, LedgerError> {
        let state = self.state.lock().await;
        Ok(state.poll(poll_id).map(PollSummary::from))
    }

    async fn poll_results(&self, poll_id: u64) -> Result<Option<Vec<u64>>, LedgerError> {
        let state = self.state.lock().await;
        match state.poll(poll_id) {
            Some(poll) => {
                let idx = (poll.id - 1) as usize;
                Ok(Some(state.counts[idx].clone()))
            }
            None => Ok(None),
        }
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}

impl LedgerState {
    fn apply(&mut self, call: &LedgerCall, sender: &str) -> TxOutcome {
        match call {
            LedgerCall::CreateOrganization { name } => {
                let id = self.organizations.len() as u64 + 1;
                self.organizations.push(Organization {
                    id,
                    name: name.clone(),
                    exists: true,
                });
                self.confirm(vec![LedgerEvent::OrganizationCreated {
                    org_id: id,
                    name: name.clone(),
                }])
            }
            LedgerCall::CreatePoll {
                org_id,
                title,
                description,
                options,
                image_hashes,
                start_time,
                end_time,
            } => {
                if self.organization(*org_id).is_none() {
                    return Self::reject(revert::ORGANIZATION_NOT_FOUND);
                }
                let id = self.polls.len() as u64 + 1;
                self.polls.push(Poll {
                    id,
                    org_id: *org_id,
                    title: title.clone(),
                    description: description.clone(),
                    options: options.clone(),
                    image_hashes: image_hashes.clone(),
                    start_time: *start_time,
                    end_time: *end_time,
                    exists: true,
                });
                self.counts.push(vec![0; options.len()]);
                self.voters.push(HashMap::new());
                self.confirm(vec![LedgerEvent::PollCreated {
                    poll_id: id,
                    org_id: *org_id,
                    title: title.clone(),
                }])
            }
            LedgerCall::Vote { poll_id, option_id } => {
                let now = Utc::now().timestamp();
                let Some(poll) = self.poll(*poll_id) else {
                    return Self::reject(revert::POLL_NOT_FOUND);
                };
                if *option_id >= poll.options.len() as u64 {
                    return Self::reject(revert::INVALID_OPTION);
                }
                if now < poll.start_time {
                    return Self::reject(revert::VOTING_NOT_STARTED);
                }
                if now > poll.end_time {
                    return Self::reject(revert::VOTING_ENDED);
                }
                let idx = (*poll_id - 1) as usize;
                if self.voters[idx].contains_key(sender) {
                    return Self::reject(revert::ALREADY_VOTED);
                }
                self.voters[idx].insert(sender.to_string(), *option_id);
                self.counts[idx][*option_id as usize] += 1;
                self.confirm(vec![LedgerEvent::Voted {
                    poll_id: *poll_id,
                    option_id: *option_id,
                    voter: sender.to_string(),
                }])
            }
        }
    }

    fn organization(&self, org_id: u64) -> Option<&Organization> {
        if org_id == 0 {
            return None;
        }
        self.organizations
            .get(org_id as usize - 1)
            .filter(|org| org.exists)
    }

    fn poll(&self, poll_id: u64) -> Option<&Poll> {
        if poll_id == 0 {
            return None;
        }
        self.polls.get(poll_id as usize - 1).filter(|p| p.exists)
    }

    fn confirm(&mut self, events: Vec<LedgerEvent>) -> TxOutcome {
        self.next_block += 1;
        TxOutcome::Confirmed {
            block_reference: format!("0x{:064x}", self.next_block),
            events,
        }
    }

    fn reject(reason: &str) -> TxOutcome {
        TxOutcome::Rejected {
            reason: reason.to_string(),
        }
    }
}

fn random_tx_id() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::traits::ConfirmationStatus;

    async fn seed_poll(ledger: &MemoryLedger, start: i64, end: i64) -> u64 {
        ledger
            .submit(LedgerCall::CreateOrganization {
                name: "Civic Club".into(),
            })
            .await
            .unwrap();
        let tx = ledger
            .submit(LedgerCall::CreatePoll {
                org_id: 1,
                title: "Colors".into(),
                description: String::new(),
                options: vec!["Red".into(), "Blue".into()],
                image_hashes: vec!["h1".into(), "h2".into()],
                start_time: start,
                end_time: end,
            })
            .await
            .unwrap();
        let report = ledger.confirmation(&tx).await.unwrap();
        assert_eq!(report.status, ConfirmationStatus::Confirmed);
        1
    }

    #[tokio::test]
    async fn create_organization_confirms_and_is_readable() {
        let ledger = MemoryLedger::new();
        let tx = ledger
            .submit(LedgerCall::CreateOrganization {
                name: "Civic Club".into(),
            })
            .await
            .unwrap();

        let report = ledger.confirmation(&tx).await.unwrap();
        assert_eq!(report.status, ConfirmationStatus::Confirmed);
        assert!(report.block_reference.is_some());
        assert_eq!(
            report.events,
            vec![LedgerEvent::OrganizationCreated {
                org_id: 1,
                name: "Civic Club".into()
            }]
        );

        let org = ledger.organization(1).await.unwrap().unwrap();
        assert_eq!(org.name, "Civic Club");
        assert!(org.exists);
        assert!(ledger.organization(2).await.unwrap().is_none());
    }

    async fn rejection(ledger: &MemoryLedger, tx: &TransactionId) -> String {
        ledger
            .confirmation(tx)
            .await
            .unwrap()
            .rejection_reason
            .unwrap()
    }

    #[tokio::test]
    async fn vote_rejections_use_the_contract_strings() {
        let ledger = MemoryLedger::new();
        let now = Utc::now().timestamp();
        seed_poll(&ledger, now - 10, now + 3600).await;

        let tx = ledger
            .submit(LedgerCall::Vote {
                poll_id: 9,
                option_id: 0,
            })
            .await
            .unwrap();
        assert_eq!(rejection(&ledger, &tx).await, revert::POLL_NOT_FOUND);

        let tx = ledger
            .submit(LedgerCall::Vote {
                poll_id: 1,
                option_id: 5,
            })
            .await
            .unwrap();
        assert_eq!(rejection(&ledger, &tx).await, revert::INVALID_OPTION);

        let tx = ledger
            .submit(LedgerCall::Vote {
                poll_id: 1,
                option_id: 0,
            })
            .await
            .unwrap();
        assert_eq!(
            ledger.confirmation(&tx).await.unwrap().status,
            ConfirmationStatus::Confirmed
        );

        let tx = ledger
            .submit(LedgerCall::Vote {
                poll_id: 1,
                option_id: 1,
            })
            .await
            .unwrap();
        assert_eq!(rejection(&ledger, &tx).await, revert::ALREADY_VOTED);

        assert_eq!(ledger.poll_results(1).await.unwrap().unwrap(), vec![1, 0]);
    }

    #[tokio::test]
    async fn distinct_senders_each_get_one_vote() {
        let ledger = MemoryLedger::new();
        let now = Utc::now().timestamp();
        seed_poll(&ledger, now - 10, now + 3600).await;

        let other = ledger.as_sender("0x00000000000000000000000000000000000000b2");
        ledger
            .submit(LedgerCall::Vote {
                poll_id: 1,
                option_id: 0,
            })
            .await
            .unwrap();
        other
            .submit(LedgerCall::Vote {
                poll_id: 1,
                option_id: 1,
            })
            .await
            .unwrap();

        assert_eq!(ledger.poll_results(1).await.unwrap().unwrap(), vec![1, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn latency_keeps_transactions_pending_until_it_elapses() {
        let ledger = MemoryLedger::new().with_latency(Duration::from_secs(5));
        let tx = ledger
            .submit(LedgerCall::CreateOrganization { name: "Org".into() })
            .await
            .unwrap();

        assert_eq!(
            ledger.confirmation(&tx).await.unwrap().status,
            ConfirmationStatus::Pending
        );

        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(
            ledger.confirmation(&tx).await.unwrap().status,
            ConfirmationStatus::Confirmed
        );
    }

    #[tokio::test]
    async fn unknown_transaction_reads_as_pending() {
        let ledger = MemoryLedger::new();
        let report = ledger
            .confirmation(&TransactionId("0xdeadbeef".into()))
            .await
            .unwrap();
        assert_eq!(report.status, ConfirmationStatus::Pending);
    }
}
