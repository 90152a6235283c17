use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::applications::projection::{get_counts, project, StatusCounts, StatusFilter};
use crate::errors::AppError;
use crate::models::application::{ApplicationRecord, ApplicationStatus, NewApplication};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub user_id: Uuid,
    #[serde(default)]
    pub filter: StatusFilter,
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<ApplicationRecord>,
    /// Counts cover the full list, not just the projected page.
    pub counts: StatusCounts,
}

#[derive(Deserialize)]
pub struct StatusUpdate {
    pub user_id: Uuid,
    pub status: ApplicationStatus,
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<ApplicationListResponse>, AppError> {
    let records = state.store.list(params.user_id).await?;
    let counts = get_counts(&records);
    let applications = project(&records, params.filter, &params.q)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ApplicationListResponse {
        applications,
        counts,
    }))
}

/// POST /api/v1/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    Json(request): Json<NewApplication>,
) -> Result<(StatusCode, Json<ApplicationRecord>), AppError> {
    request.validate().map_err(AppError::Validation)?;

    let record = state.store.insert(request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusUpdate>,
) -> Result<StatusCode, AppError> {
    state
        .store
        .update_status(request.user_id, id, request.status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/applications/:id
pub async fn handle_delete_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    state.store.delete(params.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
