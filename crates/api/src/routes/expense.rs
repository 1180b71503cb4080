//! Route definitions for the `/expenses` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::expense;
use crate::state::AppState;

/// Routes mounted at `/expenses`.
///
/// Creation and listing are project-scoped and live under
/// `/projects/{project_id}/expenses`.
///
/// ```text
/// POST   /analyze-receipt   -> AI receipt field extraction
/// POST   /check-duplicate   -> duplicate receipt check
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze-receipt", post(expense::analyze))
        .route("/check-duplicate", post(expense::check_duplicate))
        .route(
            "/{id}",
            get(expense::get_by_id)
                .put(expense::update)
                .delete(expense::delete),
        )
}
