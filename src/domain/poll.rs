use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A poll as recorded on the ledger, including the option labels and their
/// aligned image references. Immutable once confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub id: u64,
    pub org_id: u64,
    pub title: String,
    pub description: String,
    pub options: Vec<String>,
    pub image_hashes: Vec<String>,
    /// Unix timestamp at which voting opens (inclusive)
    pub start_time: i64,
    /// Unix timestamp at which voting closes (inclusive)
    pub end_time: i64,
    pub exists: bool,
}

impl Poll {
    pub fn is_open_at(&self, now: i64) -> bool {
        self.start_time <= now && now <= self.end_time
    }
}

/// What the ledger's poll getter exposes: everything except the option
/// arrays, which only surface through creation inputs and vote tallies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSummary {
    pub id: u64,
    pub org_id: u64,
    pub title: String,
    pub description: String,
    pub start_time: i64,
    pub end_time: i64,
    pub exists: bool,
}

impl From<&Poll> for PollSummary {
    fn from(poll: &Poll) -> Self {
        Self {
            id: poll.id,
            org_id: poll.org_id,
            title: poll.title.clone(),
            description: poll.description.clone(),
            start_time: poll.start_time,
            end_time: poll.end_time,
            exists: poll.exists,
        }
    }
}

/// Validated input for a createPoll transaction.
///
/// Existence of `org_id` is deliberately not checked here: that is a
/// ledger-side invariant, enforced at submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollDraft {
    pub org_id: u64,
    pub title: String,
    pub description: String,
    pub options: Vec<String>,
    pub image_hashes: Vec<String>,
    pub start_time: i64,
    pub end_time: i64,
}

impl PollDraft {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        org_id: u64,
        title: &str,
        description: &str,
        options: Vec<String>,
        image_hashes: Vec<String>,
        start_time: i64,
        end_time: i64,
    ) -> Result<Self, ValidationError> {
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if options.len() < 2 {
            return Err(ValidationError::TooFewOptions(options.len()));
        }
        if options.len() != image_hashes.len() {
            return Err(ValidationError::OptionImageMismatch {
                options: options.len(),
                images: image_hashes.len(),
            });
        }
        if start_time >= end_time {
            return Err(ValidationError::InvalidTimeWindow {
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self {
            org_id,
            title: title.to_string(),
            description: description.to_string(),
            options,
            image_hashes,
            start_time,
            end_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(
        options: &[&str],
        images: &[&str],
        start: i64,
        end: i64,
    ) -> Result<PollDraft, ValidationError> {
        PollDraft::new(
            1,
            "Board election",
            "Annual vote",
            options.iter().map(|s| s.to_string()).collect(),
            images.iter().map(|s| s.to_string()).collect(),
            start,
            end,
        )
    }

    #[test]
    fn accepts_a_well_formed_poll() {
        let draft = draft(&["Yes", "No"], &["h1", "h2"], 100, 200).unwrap();
        assert_eq!(draft.options.len(), 2);
    }

    #[test]
    fn rejects_empty_title() {
        let err = PollDraft::new(
            1,
            "  ",
            "",
            vec!["a".into(), "b".into()],
            vec!["h1".into(), "h2".into()],
            0,
            1,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::EmptyTitle);
    }

    #[test]
    fn rejects_fewer_than_two_options() {
        assert_eq!(
            draft(&["Yes"], &["h1"], 0, 1).unwrap_err(),
            ValidationError::TooFewOptions(1)
        );
    }

    #[test]
    fn rejects_misaligned_image_hashes() {
        assert_eq!(
            draft(&["Yes", "No"], &["h1"], 0, 1).unwrap_err(),
            ValidationError::OptionImageMismatch {
                options: 2,
                images: 1
            }
        );
    }

    #[test]
    fn rejects_inverted_or_empty_window() {
        assert_eq!(
            draft(&["Yes", "No"], &["h1", "h2"], 200, 100).unwrap_err(),
            ValidationError::InvalidTimeWindow {
                start: 200,
                end: 100
            }
        );
        // start == end is also invalid
        assert!(draft(&["Yes", "No"], &["h1", "h2"], 100, 100).is_err());
    }

    #[test]
    fn poll_window_membership_is_inclusive() {
        let poll = Poll {
            id: 1,
            org_id: 1,
            title: "t".into(),
            description: String::new(),
            options: vec!["a".into(), "b".into()],
            image_hashes: vec!["h1".into(), "h2".into()],
            start_time: 100,
            end_time: 200,
            exists: true,
        };
        assert!(poll.is_open_at(100));
        assert!(poll.is_open_at(200));
        assert!(!poll.is_open_at(99));
        assert!(!poll.is_open_at(201));
    }
}
