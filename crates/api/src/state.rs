use std::sync::Arc;

use siteledger_ai::LlmClient;
use siteledger_cloud::ObjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: siteledger_db::DbPool,
    /// Server configuration (JWT secrets, CORS, company name).
    pub config: Arc<ServerConfig>,
    /// Chat-completions client shared by all AI flows.
    pub llm: Arc<LlmClient>,
    /// S3-backed object store for pre-signed upload/view URLs.
    pub store: Arc<ObjectStore>,
}
