//! Ledger access: the client seam plus its two backends.

mod evm;
mod memory;
mod traits;

pub use evm::EvmLedger;
pub use memory::MemoryLedger;
#[cfg(test)]
pub use traits::MockLedgerClient;
pub use traits::{
    revert, ConfirmationReport, ConfirmationStatus, LedgerCall, LedgerClient, LedgerEvent,
    TransactionId,
};
