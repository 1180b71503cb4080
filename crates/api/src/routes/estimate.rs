//! Route definitions for the `/estimates` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::estimate;
use crate::state::AppState;

/// Routes mounted at `/estimates`.
///
/// Creation and listing are project-scoped and live under
/// `/projects/{project_id}/estimates`.
///
/// ```text
/// GET    /{id}                 -> get_by_id (with items)
/// PUT    /{id}                 -> update (replaces items, recomputes totals)
/// DELETE /{id}                 -> delete
/// PUT    /{id}/status          -> set_status
/// POST   /{id}/generate-items  -> AI item generation
/// GET    /{id}/export/csv      -> line-item CSV
/// GET    /{id}/export/html     -> client-facing HTML document
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(estimate::get_by_id)
                .put(estimate::update)
                .delete(estimate::delete),
        )
        .route("/{id}/status", put(estimate::set_status))
        .route("/{id}/generate-items", post(estimate::generate))
        .route("/{id}/export/csv", get(estimate::export_csv))
        .route("/{id}/export/html", get(estimate::export_html))
}
