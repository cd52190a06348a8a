use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{RatingRecord, SubjectId};
use super::repository::{
    BlockRepository, ProfileStatsRepository, RatingRepository, RepositoryError,
};
use super::service::{RatingSubmission, ReputationService, ReputationServiceError};

type SharedService<R, B, P> = Arc<ReputationService<R, B, P>>;

#[derive(Debug, Deserialize)]
pub(crate) struct BlockRequest {
    pub(crate) blocker: SubjectId,
    pub(crate) blocked: SubjectId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScoreRequest {
    pub(crate) ratings: Vec<RatingRecord>,
    #[serde(default)]
    pub(crate) blocked_count: u32,
}

/// Router builder exposing rating intake, block intake, and safety stats.
pub fn reputation_router<R, B, P>(service: SharedService<R, B, P>) -> Router
where
    R: RatingRepository + 'static,
    B: BlockRepository + 'static,
    P: ProfileStatsRepository + 'static,
{
    Router::new()
        .route("/api/v1/ratings", post(submit_rating_handler::<R, B, P>))
        .route("/api/v1/blocks", post(block_handler::<R, B, P>))
        .route(
            "/api/v1/profiles/:subject_id/safety",
            get(stats_handler::<R, B, P>),
        )
        .route(
            "/api/v1/profiles/:subject_id/safety/recalculate",
            post(recalculate_handler::<R, B, P>),
        )
        .route("/api/v1/reputation/score", post(score_handler::<R, B, P>))
        .with_state(service)
}

pub(crate) async fn submit_rating_handler<R, B, P>(
    State(service): State<SharedService<R, B, P>>,
    Json(submission): Json<RatingSubmission>,
) -> Response
where
    R: RatingRepository + 'static,
    B: BlockRepository + 'static,
    P: ProfileStatsRepository + 'static,
{
    match service.submit_rating(submission) {
        Ok(stats) => (StatusCode::ACCEPTED, Json(stats)).into_response(),
        Err(ReputationServiceError::Repository(RepositoryError::Conflict)) => error_response(
            StatusCode::CONFLICT,
            "rating already submitted for this subject",
        ),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn block_handler<R, B, P>(
    State(service): State<SharedService<R, B, P>>,
    Json(request): Json<BlockRequest>,
) -> Response
where
    R: RatingRepository + 'static,
    B: BlockRepository + 'static,
    P: ProfileStatsRepository + 'static,
{
    match service.record_block(request.blocker, request.blocked) {
        Ok(outcome) => (StatusCode::ACCEPTED, Json(outcome)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn stats_handler<R, B, P>(
    State(service): State<SharedService<R, B, P>>,
    Path(subject_id): Path<String>,
) -> Response
where
    R: RatingRepository + 'static,
    B: BlockRepository + 'static,
    P: ProfileStatsRepository + 'static,
{
    match service.stats(&SubjectId(subject_id)) {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn recalculate_handler<R, B, P>(
    State(service): State<SharedService<R, B, P>>,
    Path(subject_id): Path<String>,
) -> Response
where
    R: RatingRepository + 'static,
    B: BlockRepository + 'static,
    P: ProfileStatsRepository + 'static,
{
    match service.recalculate(&SubjectId(subject_id)) {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn score_handler<R, B, P>(
    State(service): State<SharedService<R, B, P>>,
    Json(request): Json<ScoreRequest>,
) -> Response
where
    R: RatingRepository + 'static,
    B: BlockRepository + 'static,
    P: ProfileStatsRepository + 'static,
{
    let result = service
        .engine()
        .compute(&request.ratings, request.blocked_count);
    (StatusCode::OK, Json(result)).into_response()
}

/// HTTP status for a service failure, shared with `AppError`'s response mapping.
pub(crate) fn service_error_status(error: &ReputationServiceError) -> StatusCode {
    match error {
        ReputationServiceError::SelfRating | ReputationServiceError::SelfBlock => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ReputationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ReputationServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ReputationServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

fn service_error_response(error: ReputationServiceError) -> Response {
    error_response(service_error_status(&error), &error.to_string())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
