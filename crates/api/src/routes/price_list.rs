//! Route definitions for the `/price-list` catalog resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::price_list;
use crate::state::AppState;

/// Routes mounted at `/price-list`.
///
/// ```text
/// GET    /       -> list (?category= filter)
/// POST   /       -> create (admin/manager)
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update (admin/manager)
/// DELETE /{id}   -> delete (admin/manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(price_list::list).post(price_list::create))
        .route(
            "/{id}",
            get(price_list::get_by_id)
                .put(price_list::update)
                .delete(price_list::delete),
        )
}
