use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::warn;

use super::domain::{Candidate, CandidateId};
use super::repository::CandidateStore;
use super::service::CandidateService;
use crate::error::AppError;

/// Router builder exposing candidate intake endpoints.
pub fn candidate_router<S>(service: Arc<CandidateService<S>>) -> Router
where
    S: CandidateStore + 'static,
{
    Router::new()
        .route("/api/v1/candidates", post(save_handler::<S>))
        .route("/api/v1/candidates/:candidate_id", get(fetch_handler::<S>))
        .with_state(service)
}

/// Every intake failure on the save path is a client-facing 400 carrying the error text verbatim.
pub(crate) async fn save_handler<S>(
    State(service): State<Arc<CandidateService<S>>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Candidate>), AppError>
where
    S: CandidateStore + 'static,
{
    let Json(payload) = payload?;

    let candidate = service.save(payload).await.map_err(|error| {
        warn!(%error, "candidate rejected");
        AppError::Intake(error)
    })?;

    Ok((StatusCode::CREATED, Json(candidate)))
}

pub(crate) async fn fetch_handler<S>(
    State(service): State<Arc<CandidateService<S>>>,
    Path(candidate_id): Path<String>,
) -> Result<Json<Candidate>, AppError>
where
    S: CandidateStore + 'static,
{
    let id = candidate_id
        .parse::<u64>()
        .map_err(|_| AppError::InvalidRequest("Invalid candidate id".to_string()))?;

    let candidate = service
        .get(CandidateId(id))
        .await
        .map_err(|error| {
            if error.is_not_found() {
                AppError::NotFound(error)
            } else {
                AppError::Intake(error)
            }
        })?;

    Ok(Json(candidate))
}
