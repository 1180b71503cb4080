//! Handlers for project photos.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use siteledger_core::error::CoreError;
use siteledger_core::types::DbId;
use siteledger_db::models::photo::{CreatePhoto, Photo, UpdatePhoto};
use siteledger_db::repositories::PhotoRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::project::require_project;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/photos
pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreatePhoto>,
) -> AppResult<(StatusCode, Json<Photo>)> {
    input.validate()?;
    require_project(&state, project_id).await?;
    let photo = PhotoRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(photo)))
}

/// GET /api/v1/projects/{project_id}/photos
pub async fn list_by_project(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Photo>>> {
    require_project(&state, project_id).await?;
    let photos = PhotoRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(photos))
}

/// PUT /api/v1/photos/{id}
pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePhoto>,
) -> AppResult<Json<Photo>> {
    let photo = PhotoRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Photo", id }))?;
    Ok(Json(photo))
}

/// DELETE /api/v1/photos/{id}
pub async fn delete(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = PhotoRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Photo", id }))
    }
}
