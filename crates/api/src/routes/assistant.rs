//! Route definitions for the `/assistant` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::assistant;
use crate::state::AppState;

/// Routes mounted at `/assistant`.
///
/// ```text
/// POST   /chat      -> one conversation turn (text or tool calls)
/// GET    /history   -> transcript (?limit=)
/// DELETE /history   -> clear transcript
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(assistant::chat))
        .route(
            "/history",
            get(assistant::history).delete(assistant::clear_history),
        )
}
