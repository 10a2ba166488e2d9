//! votegate: a gateway between request/response clients and a ledger-backed
//! voting contract.
//!
//! The ledger records organizations, polls, and votes; it is the sole source
//! of truth, and its confirmations are asynchronous and eventual. This crate
//! mediates: it validates commands, submits them as signed transactions,
//! tracks confirmation with an explicit timeout, classifies rejection reasons
//! into a stable error taxonomy, and serves reads straight from ledger state.

pub mod api;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod domain;
pub mod error;
pub mod ledger;
pub mod tracker;

pub use config::AppConfig;
pub use coordinator::VotingCoordinator;
pub use domain::{Organization, Poll, PollResults, PollSummary, Vote};
pub use error::{DomainError, LedgerError, Result, ValidationError, VotegateError};
pub use ledger::{EvmLedger, LedgerClient, MemoryLedger};
pub use tracker::{TransactionReceipt, TransactionTracker, TxStatus};
