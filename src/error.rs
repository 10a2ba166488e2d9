use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the voting gateway
#[derive(Error, Debug)]
pub enum VotegateError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Input rejected before anything was submitted to the ledger
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // A ledger-enforced business rule was violated
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Transport/availability failure or an unrecognized rejection
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for VotegateError
pub type Result<T> = std::result::Result<T, VotegateError>;

/// Malformed or incomplete input, detected before any ledger interaction.
/// Always recoverable by the caller correcting the input; never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("organization name must not be empty")]
    EmptyName,

    #[error("poll title must not be empty")]
    EmptyTitle,

    #[error("poll needs at least 2 options, got {0}")]
    TooFewOptions(usize),

    #[error("{options} options but {images} image hashes; they must align 1:1")]
    OptionImageMismatch { options: usize, images: usize },

    #[error("invalid time window: start {start} is not before end {end}")]
    InvalidTimeWindow { start: i64, end: i64 },
}

/// A ledger-enforced rule was violated. Re-classified from the raw rejection
/// reason the ledger reports; never retried (retrying cannot succeed).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("organization {0} does not exist")]
    OrganizationNotFound(u64),

    #[error("poll {0} does not exist")]
    PollNotFound(u64),

    #[error("option {option} is out of range for poll {poll_id}")]
    InvalidOption { poll_id: u64, option: u64 },

    #[error("poll {0} is not open for voting")]
    OutsideVotingWindow(u64),

    #[error("this voter has already voted on poll {0}")]
    AlreadyVoted(u64),
}

/// Transport or availability failure talking to the ledger. Candidates for
/// caller-driven retry; the gateway itself never resubmits, since none of the
/// write operations are idempotent.
#[derive(Error, Debug, Clone)]
pub enum LedgerError {
    #[error("ledger connection failed: {0}")]
    Connection(String),

    #[error("transaction signing failed: {0}")]
    Signing(String),

    #[error("transaction rejected by ledger: {0}")]
    Rejected(String),

    #[error(
        "timed out after {waited_ms}ms waiting for confirmation of {tx_id}; \
         the transaction may still confirm on the ledger"
    )]
    Timeout { tx_id: String, waited_ms: u64 },
}

/// Coarse classification exposed to callers at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    ValidationError,
    DomainError,
    LedgerError,
    InternalError,
}

/// Structured error payload for the request boundary: `{kind, message}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

impl VotegateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VotegateError::Validation(_) => ErrorKind::ValidationError,
            VotegateError::Domain(_) => ErrorKind::DomainError,
            VotegateError::Ledger(_) => ErrorKind::LedgerError,
            _ => ErrorKind::InternalError,
        }
    }
}

impl ErrorBody {
    pub fn from_error(err: &VotegateError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
