//! Rejection-reason classification.
//!
//! The contract reports rule violations as revert strings, which are not a
//! designed API: nodes wrap them in prefixes like `execution reverted: ` and
//! the wording is pinned only by the deployed contract source. Matching is
//! therefore case-insensitive substring, and every known string is covered by
//! a test below so a contract change shows up as a test failure, not as a
//! silent reclassification. Anything unrecognized stays a `LedgerError`.

use crate::error::{DomainError, LedgerError, VotegateError};

/// Classify a rejected createPoll. The only rule the ledger enforces there
/// beyond input shape is organization existence.
pub(crate) fn create_poll_rejection(org_id: u64, reason: &str) -> VotegateError {
    let lower = reason.to_ascii_lowercase();
    if lower.contains("organization does not exist") {
        return DomainError::OrganizationNotFound(org_id).into();
    }
    LedgerError::Rejected(reason.to_string()).into()
}

/// Classify a rejected vote.
pub(crate) fn vote_rejection(poll_id: u64, option_id: u64, reason: &str) -> VotegateError {
    let lower = reason.to_ascii_lowercase();
    if lower.contains("poll does not exist") {
        return DomainError::PollNotFound(poll_id).into();
    }
    if lower.contains("invalid option") {
        return DomainError::InvalidOption {
            poll_id,
            option: option_id,
        }
        .into();
    }
    if lower.contains("voting has not started") || lower.contains("voting has ended") {
        return DomainError::OutsideVotingWindow(poll_id).into();
    }
    if lower.contains("already voted") {
        return DomainError::AlreadyVoted(poll_id).into();
    }
    LedgerError::Rejected(reason.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VotegateError;
    use crate::ledger::revert;

    fn domain(err: VotegateError) -> DomainError {
        match err {
            VotegateError::Domain(d) => d,
            other => panic!("expected a domain error, got {other:?}"),
        }
    }

    #[test]
    fn organization_not_found_is_reclassified() {
        assert_eq!(
            domain(create_poll_rejection(42, revert::ORGANIZATION_NOT_FOUND)),
            DomainError::OrganizationNotFound(42)
        );
    }

    #[test]
    fn node_prefixes_do_not_defeat_the_match() {
        assert_eq!(
            domain(create_poll_rejection(
                7,
                "execution reverted: Organization does not exist"
            )),
            DomainError::OrganizationNotFound(7)
        );
        assert_eq!(
            domain(vote_rejection(3, 1, "execution reverted: Already voted")),
            DomainError::AlreadyVoted(3)
        );
    }

    #[test]
    fn poll_not_found_is_reclassified() {
        assert_eq!(
            domain(vote_rejection(9, 0, revert::POLL_NOT_FOUND)),
            DomainError::PollNotFound(9)
        );
    }

    #[test]
    fn invalid_option_is_reclassified() {
        assert_eq!(
            domain(vote_rejection(2, 5, revert::INVALID_OPTION)),
            DomainError::InvalidOption { poll_id: 2, option: 5 }
        );
    }

    #[test]
    fn both_window_reverts_map_to_outside_voting_window() {
        assert_eq!(
            domain(vote_rejection(4, 0, revert::VOTING_NOT_STARTED)),
            DomainError::OutsideVotingWindow(4)
        );
        assert_eq!(
            domain(vote_rejection(4, 0, revert::VOTING_ENDED)),
            DomainError::OutsideVotingWindow(4)
        );
    }

    #[test]
    fn already_voted_is_reclassified() {
        assert_eq!(
            domain(vote_rejection(6, 1, revert::ALREADY_VOTED)),
            DomainError::AlreadyVoted(6)
        );
    }

    #[test]
    fn unrecognized_reasons_stay_ledger_errors() {
        let err = vote_rejection(1, 0, "out of gas");
        assert!(matches!(
            err,
            VotegateError::Ledger(LedgerError::Rejected(reason)) if reason == "out of gas"
        ));
        let err = create_poll_rejection(1, "nonce too low");
        assert!(matches!(err, VotegateError::Ledger(_)));
    }
}
