//! Route definitions for the `/projects` resource.
//!
//! Also nests project-scoped expense, photo, file, and estimate routes
//! under `/projects/{project_id}/...`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{estimate, expense, file, photo, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
///
/// GET    /{project_id}/expenses             -> list_by_project
/// POST   /{project_id}/expenses             -> create
/// GET    /{project_id}/expenses/totals      -> totals_by_category
///
/// GET    /{project_id}/photos               -> list_by_project
/// POST   /{project_id}/photos               -> create
///
/// GET    /{project_id}/files                -> list_by_project
/// POST   /{project_id}/files                -> create
///
/// GET    /{project_id}/estimates            -> list_by_project
/// POST   /{project_id}/estimates            -> create
/// ```
pub fn router() -> Router<AppState> {
    let expense_routes = Router::new()
        .route("/", get(expense::list_by_project).post(expense::create))
        .route("/totals", get(expense::totals_by_category));

    let photo_routes = Router::new().route("/", get(photo::list_by_project).post(photo::create));

    let file_routes = Router::new().route("/", get(file::list_by_project).post(file::create));

    let estimate_routes =
        Router::new().route("/", get(estimate::list_by_project).post(estimate::create));

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .nest("/{project_id}/expenses", expense_routes)
        .nest("/{project_id}/photos", photo_routes)
        .nest("/{project_id}/files", file_routes)
        .nest("/{project_id}/estimates", estimate_routes)
}
