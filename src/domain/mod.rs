mod organization;
mod poll;
mod vote;

pub use organization::{Organization, OrganizationDraft};
pub use poll::{Poll, PollDraft, PollSummary};
pub use vote::{PollResults, Vote};
