//! Voting Coordinator
//!
//! The orchestration boundary between request/response callers and the
//! ledger: validate, submit, await confirmation, respond, with rejection
//! reasons re-classified into the domain error taxonomy.

mod classify;
mod coordinator;

pub use coordinator::{OrganizationCreation, PollCreation, VoteOutcome, VotingCoordinator};
