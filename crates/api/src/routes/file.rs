//! Route definitions for the `/files` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::file;
use crate::state::AppState;

/// Routes mounted at `/files`.
///
/// Metadata creation and listing are project-scoped and live under
/// `/projects/{project_id}/files`.
///
/// ```text
/// POST   /upload-url   -> pre-signed PUT URL
/// GET    /view-url     -> pre-signed GET URL (?key=)
/// PUT    /{id}         -> update metadata
/// DELETE /{id}         -> delete metadata
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload-url", post(file::upload_url))
        .route("/view-url", get(file::view_url))
        .route("/{id}", axum::routing::put(file::update).delete(file::delete))
}
