//! Route definitions for the `/photos` resource.

use axum::routing::put;
use axum::Router;

use crate::handlers::photo;
use crate::state::AppState;

/// Routes mounted at `/photos`.
///
/// Creation and listing are project-scoped and live under
/// `/projects/{project_id}/photos`.
///
/// ```text
/// PUT    /{id}   -> update metadata
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", put(photo::update).delete(photo::delete))
}
