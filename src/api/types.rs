//! Wire types for the HTTP boundary. Field names stay camelCase to match
//! what frontend clients already send and expect back.

use serde::{Deserialize, Serialize};

use crate::coordinator::{OrganizationCreation, PollCreation, VoteOutcome};
use crate::domain::PollResults;

#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    pub org_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub options: Vec<String>,
    pub image_hashes: Vec<String>,
    pub start_time: i64,
    pub end_time: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub poll_id: u64,
    pub option_id: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationResponse {
    pub message: &'static str,
    pub organization_id: Option<u64>,
    pub tx_hash: String,
    pub block_reference: Option<String>,
}

impl From<OrganizationCreation> for CreateOrganizationResponse {
    fn from(outcome: OrganizationCreation) -> Self {
        Self {
            message: "Organization created",
            organization_id: outcome.organization_id,
            tx_hash: outcome.transaction_id.to_string(),
            block_reference: outcome.block_reference,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollResponse {
    pub message: &'static str,
    pub poll_id: Option<u64>,
    pub tx_hash: String,
    pub block_reference: Option<String>,
}

impl From<PollCreation> for CreatePollResponse {
    fn from(outcome: PollCreation) -> Self {
        Self {
            message: "Poll created",
            poll_id: outcome.poll_id,
            tx_hash: outcome.transaction_id.to_string(),
            block_reference: outcome.block_reference,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub message: &'static str,
    pub poll_id: u64,
    pub option_id: u64,
    pub tx_hash: String,
}

impl From<VoteOutcome> for VoteResponse {
    fn from(outcome: VoteOutcome) -> Self {
        Self {
            message: "Vote cast",
            poll_id: outcome.poll_id,
            option_id: outcome.option_id,
            tx_hash: outcome.transaction_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsResponse {
    pub poll_id: u64,
    pub counts: Vec<u64>,
}

impl From<PollResults> for ResultsResponse {
    fn from(results: PollResults) -> Self {
        Self {
            poll_id: results.poll_id,
            counts: results.counts,
        }
    }
}
