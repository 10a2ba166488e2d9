//! Transaction lifecycle tracking.
//!
//! Turns an asynchronous ledger submission into a single awaitable outcome:
//! pending until the ledger reports the transaction included (confirmed) or
//! rejected, or until the configured timeout elapses. The tracker never
//! retries; whether a resubmission is safe is the coordinator's call, and
//! none of the voting operations are idempotent.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::LedgerError;
use crate::ledger::{ConfirmationStatus, LedgerClient, LedgerEvent, TransactionId};

/// Lifecycle state of a tracked transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Pending,
    Confirmed,
    Failed,
}

impl TxStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TxStatus::Confirmed | TxStatus::Failed)
    }
}

/// Stable receipt for one submitted transaction. Request-scoped: created at
/// submit time, driven to a terminal state by the tracker, discarded once the
/// coordinator has reported the outcome.
#[derive(Debug, Clone)]
pub struct TransactionReceipt {
    pub transaction_id: TransactionId,
    pub status: TxStatus,
    /// Present only once confirmed
    pub block_reference: Option<String>,
    pub events: Vec<LedgerEvent>,
}

impl TransactionReceipt {
    pub fn pending(transaction_id: TransactionId) -> Self {
        Self {
            transaction_id,
            status: TxStatus::Pending,
            block_reference: None,
            events: Vec::new(),
        }
    }

    fn confirm(&mut self, block_reference: Option<String>, events: Vec<LedgerEvent>) {
        self.status = TxStatus::Confirmed;
        self.block_reference = block_reference;
        self.events = events;
    }

    fn fail(&mut self) {
        self.status = TxStatus::Failed;
    }
}

/// Drives submitted transactions to a terminal state by polling the ledger.
pub struct TransactionTracker {
    ledger: Arc<dyn LedgerClient>,
    poll_interval: Duration,
}

impl TransactionTracker {
    pub fn new(ledger: Arc<dyn LedgerClient>, poll_interval: Duration) -> Self {
        Self {
            ledger,
            poll_interval,
        }
    }

    /// Wait until the ledger reports the transaction confirmed or rejected,
    /// or until `timeout` elapses. A timeout abandons local tracking only:
    /// the transaction itself cannot be cancelled and may still confirm.
    pub async fn await_confirmation(
        &self,
        tx_id: TransactionId,
        timeout: Duration,
    ) -> Result<TransactionReceipt, LedgerError> {
        let mut receipt = TransactionReceipt::pending(tx_id);
        let deadline = Instant::now() + timeout;
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let report = self.ledger.confirmation(&receipt.transaction_id).await?;
            match report.status {
                ConfirmationStatus::Confirmed => {
                    receipt.confirm(report.block_reference, report.events);
                    info!(
                        tx = %receipt.transaction_id,
                        block = receipt.block_reference.as_deref().unwrap_or("?"),
                        "transaction confirmed"
                    );
                    return Ok(receipt);
                }
                ConfirmationStatus::Rejected => {
                    receipt.fail();
                    let reason = report
                        .rejection_reason
                        .unwrap_or_else(|| "transaction rejected".to_string());
                    warn!(tx = %receipt.transaction_id, %reason, "transaction rejected");
                    return Err(LedgerError::Rejected(reason));
                }
                ConfirmationStatus::Pending => {
                    if Instant::now() >= deadline {
                        receipt.fail();
                        warn!(
                            tx = %receipt.transaction_id,
                            waited_ms = timeout.as_millis() as u64,
                            "gave up waiting for confirmation; the transaction may still confirm"
                        );
                        return Err(LedgerError::Timeout {
                            tx_id: receipt.transaction_id.to_string(),
                            waited_ms: timeout.as_millis() as u64,
                        });
                    }
                    debug!(tx = %receipt.transaction_id, "still pending");
                }
            }
        }
    }
}
