//! Route definitions for the `/reports` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::report;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET    /                  -> list
/// POST   /generate          -> aggregate and store a new report
/// GET    /{id}              -> get_by_id
/// DELETE /{id}              -> delete
/// GET    /{id}/export/csv   -> project-rows CSV
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(report::list))
        .route("/generate", post(report::generate))
        .route("/{id}", get(report::get_by_id).delete(report::delete))
        .route("/{id}/export/csv", get(report::export_csv))
}
