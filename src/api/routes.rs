use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use super::types::{
    CreateOrganizationRequest, CreateOrganizationResponse, CreatePollRequest, CreatePollResponse,
    ResultsResponse, VoteRequest, VoteResponse,
};
use super::AppState;
use crate::domain::{Organization, PollSummary};
use crate::error::{DomainError, ErrorBody, LedgerError, VotegateError};

/// The four camelCase write/read routes frontend clients expect, plus
/// read-throughs for the contract's entity getters.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/createOrganization", post(create_organization))
        .route("/createPoll", post(create_poll))
        .route("/vote", post(vote))
        .route("/getResults/:poll_id", get(get_results))
        .route("/organizations/:org_id", get(get_organization))
        .route("/polls/:poll_id", get(get_poll))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Classified error, rendered as `{kind, message}` with a matching status.
pub struct ApiError(VotegateError);

impl From<VotegateError> for ApiError {
    fn from(err: VotegateError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            VotegateError::Validation(_) => StatusCode::BAD_REQUEST,
            VotegateError::Domain(domain) => match domain {
                DomainError::OrganizationNotFound(_) | DomainError::PollNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                DomainError::InvalidOption { .. } => StatusCode::BAD_REQUEST,
                DomainError::OutsideVotingWindow(_) | DomainError::AlreadyVoted(_) => {
                    StatusCode::CONFLICT
                }
            },
            VotegateError::Ledger(LedgerError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            VotegateError::Ledger(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorBody::from_error(&self.0))).into_response()
    }
}

async fn create_organization(
    State(state): State<AppState>,
    Json(req): Json<CreateOrganizationRequest>,
) -> Result<Json<CreateOrganizationResponse>, ApiError> {
    let outcome = state.coordinator.create_organization(&req.name).await?;
    Ok(Json(outcome.into()))
}

async fn create_poll(
    State(state): State<AppState>,
    Json(req): Json<CreatePollRequest>,
) -> Result<Json<CreatePollResponse>, ApiError> {
    let outcome = state
        .coordinator
        .create_poll(
            req.org_id,
            &req.title,
            &req.description,
            req.options,
            req.image_hashes,
            req.start_time,
            req.end_time,
        )
        .await?;
    Ok(Json(outcome.into()))
}

async fn vote(
    State(state): State<AppState>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, ApiError> {
    let outcome = state.coordinator.vote(req.poll_id, req.option_id).await?;
    Ok(Json(outcome.into()))
}

async fn get_results(
    State(state): State<AppState>,
    Path(poll_id): Path<u64>,
) -> Result<Json<ResultsResponse>, ApiError> {
    let results = state.coordinator.results(poll_id).await?;
    Ok(Json(results.into()))
}

async fn get_organization(
    State(state): State<AppState>,
    Path(org_id): Path<u64>,
) -> Result<Json<Organization>, ApiError> {
    Ok(Json(state.coordinator.organization(org_id).await?))
}

async fn get_poll(
    State(state): State<AppState>,
    Path(poll_id): Path<u64>,
) -> Result<Json<PollSummary>, ApiError> {
    Ok(Json(state.coordinator.poll(poll_id).await?))
}
