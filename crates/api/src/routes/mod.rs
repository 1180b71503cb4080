pub mod assistant;
pub mod auth;
pub mod client;
pub mod estimate;
pub mod expense;
pub mod file;
pub mod health;
pub mod photo;
pub mod price_list;
pub mod project;
pub mod report;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                              login (public)
/// /auth/refresh                            refresh (public)
/// /auth/logout                             logout
/// /auth/me                                 current user
///
/// /users                                   list, create (admin only)
/// /users/{id}                              update role/active (admin only)
///
/// /projects                                list, create
/// /projects/{id}                           get, update, delete
/// /projects/{project_id}/expenses          list, create
/// /projects/{project_id}/expenses/totals   per-category totals
/// /projects/{project_id}/photos            list, create
/// /projects/{project_id}/files             list, create
/// /projects/{project_id}/estimates         list, create
///
/// /clients                                 list, create
/// /clients/follow-ups                      due follow-ups
/// /clients/{id}                            get, update, delete
///
/// /price-list                              list, create
/// /price-list/{id}                         get, update, delete
///
/// /estimates/{id}                          get, update, delete
/// /estimates/{id}/status                   set status (PUT)
/// /estimates/{id}/generate-items           AI generation (POST)
/// /estimates/{id}/export/csv               CSV export
/// /estimates/{id}/export/html              HTML export
///
/// /expenses/analyze-receipt                AI receipt extraction (POST)
/// /expenses/check-duplicate                duplicate check (POST)
/// /expenses/{id}                           get, update, delete
///
/// /photos/{id}                             update, delete
///
/// /files/upload-url                        pre-signed PUT URL (POST)
/// /files/view-url                          pre-signed GET URL
/// /files/{id}                              update, delete
///
/// /reports                                 list
/// /reports/generate                        generate (POST)
/// /reports/{id}                            get, delete
/// /reports/{id}/export/csv                 CSV export
///
/// /assistant/chat                          chat turn (POST)
/// /assistant/history                       get, clear transcript
/// ```
///
/// All routes except `/auth/login` and `/auth/refresh` require a Bearer
/// access token, enforced by the `AuthUser` extractor in each handler.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", user::router())
        .nest("/projects", project::router())
        .nest("/clients", client::router())
        .nest("/price-list", price_list::router())
        .nest("/estimates", estimate::router())
        .nest("/expenses", expense::router())
        .nest("/photos", photo::router())
        .nest("/files", file::router())
        .nest("/reports", report::router())
        .nest("/assistant", assistant::router())
}
