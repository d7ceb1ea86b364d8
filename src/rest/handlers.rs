use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    repository::RunRepository,
    types::{RepositoryError, Run},
};

use super::{
    models::{ErrorResponse, HealthResponse},
    AppState,
};

pub async fn health<R: RunRepository + Clone + Send + Sync + 'static>(
    State(state): State<AppState<R>>,
) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            uptime_secs,
        }),
    )
}

pub async fn list_runs<R: RunRepository + Clone + Send + Sync + 'static>(
    State(state): State<AppState<R>>,
) -> impl IntoResponse {
    match state.repo.find_all() {
        Ok(runs) => Json(runs).into_response(),
        Err(err) => {
            log::error!("Failed to list runs: {:?}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn get_run<R: RunRepository + Clone + Send + Sync + 'static>(
    State(state): State<AppState<R>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.repo.find_by_id(id) {
        Ok(Some(run)) => Json(run).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                message: format!("no run with id {}", id),
            }),
        )
            .into_response(),
        Err(err) => {
            log::error!("Failed to load run {}: {:?}", id, err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn create_run<R: RunRepository + Clone + Send + Sync + 'static>(
    State(state): State<AppState<R>>,
    Json(run): Json<Run>,
) -> impl IntoResponse {
    let id = run.id;
    match state.repo.create(run) {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(err) => repository_error_response("create", id, err),
    }
}

pub async fn update_run<R: RunRepository + Clone + Send + Sync + 'static>(
    State(state): State<AppState<R>>,
    Path(id): Path<i64>,
    Json(run): Json<Run>,
) -> impl IntoResponse {
    match state.repo.update(run, id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => repository_error_response("update", id, err),
    }
}

pub async fn delete_run<R: RunRepository + Clone + Send + Sync + 'static>(
    State(state): State<AppState<R>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.repo.delete(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => repository_error_response("delete", id, err),
    }
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: "endpoint not found".to_string(),
        }),
    )
}

fn repository_error_response(
    op: &str,
    id: i64,
    err: RepositoryError,
) -> axum::response::Response {
    match err {
        RepositoryError::Validation(message) => {
            log::warn!("Rejected run {} on {}: {}", id, op, message);
            (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
        }
        RepositoryError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                message: format!("no run with id {}", id),
            }),
        )
            .into_response(),
        RepositoryError::DuplicateKey(id) => {
            log::warn!("Duplicate run id {} on {}", id, op);
            (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    message: format!("a run with id {} already exists", id),
                }),
            )
                .into_response()
        }
        err @ (RepositoryError::Inconsistency { .. } | RepositoryError::Backend(_)) => {
            log::error!("Repository failure on {} for run {}: {:?}", op, id, err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
