//! Handlers for project files and pre-signed storage URLs.
//!
//! Uploads are a three-step dance: the client asks for a pre-signed PUT
//! URL, PUTs the bytes straight to the bucket, then registers metadata
//! under the project. The server never touches file content.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use siteledger_core::error::CoreError;
use siteledger_core::types::DbId;
use siteledger_db::models::project_file::{
    CreateProjectFile, ProjectFile, UpdateProjectFile, FILE_CATEGORIES,
};
use siteledger_db::repositories::ProjectFileRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::project::require_project;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Pre-signed URLs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    pub file_name: String,
    /// Defaults to `application/pdf`, the dominant upload type.
    pub file_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    pub success: bool,
    pub upload_url: String,
    pub file_url: String,
    pub key: String,
}

/// POST /api/v1/files/upload-url
pub async fn upload_url(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UploadUrlRequest>,
) -> AppResult<Json<UploadUrlResponse>> {
    if input.file_name.trim().is_empty() {
        return Err(AppError::BadRequest("File name required".into()));
    }

    let content_type = input.file_type.as_deref().unwrap_or("application/pdf");
    let target = state
        .store
        .upload_url(
            input.file_name.trim(),
            content_type,
            Utc::now().timestamp_millis(),
        )
        .await?;

    Ok(Json(UploadUrlResponse {
        success: true,
        upload_url: target.upload_url,
        file_url: target.file_url,
        key: target.key,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ViewUrlParams {
    pub key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewUrlResponse {
    pub view_url: String,
}

/// GET /api/v1/files/view-url?key=
pub async fn view_url(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ViewUrlParams>,
) -> AppResult<Json<ViewUrlResponse>> {
    let view_url = state.store.view_url(&params.key).await?;
    Ok(Json(ViewUrlResponse { view_url }))
}

// ---------------------------------------------------------------------------
// Metadata CRUD
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct FileListParams {
    pub category: Option<String>,
}

/// POST /api/v1/projects/{project_id}/files
pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateProjectFile>,
) -> AppResult<(StatusCode, Json<ProjectFile>)> {
    input.validate()?;
    if !FILE_CATEGORIES.contains(&input.category.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown file category: {}",
            input.category
        ))));
    }
    require_project(&state, project_id).await?;
    let file = ProjectFileRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(file)))
}

/// GET /api/v1/projects/{project_id}/files?category=
pub async fn list_by_project(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<FileListParams>,
) -> AppResult<Json<Vec<ProjectFile>>> {
    require_project(&state, project_id).await?;
    let files =
        ProjectFileRepo::list_by_project(&state.pool, project_id, params.category.as_deref())
            .await?;
    Ok(Json(files))
}

/// PUT /api/v1/files/{id}
pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProjectFile>,
) -> AppResult<Json<ProjectFile>> {
    let file = ProjectFileRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "File", id }))?;
    Ok(Json(file))
}

/// DELETE /api/v1/files/{id}
pub async fn delete(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProjectFileRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "File", id }))
    }
}
