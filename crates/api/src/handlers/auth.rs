//! Handlers for the `/auth` resource: login, refresh, logout, me.

use axum::extract::State;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use siteledger_core::error::CoreError;
use siteledger_db::models::user::User;
use siteledger_db::repositories::{SessionRepo, UserRepo};

use crate::auth::jwt;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
    /// Revoke every session for the user, not just this one.
    #[serde(default)]
    pub everywhere: bool,
}

/// Identical message for wrong email and wrong password, so login
/// failures don't reveal which accounts exist.
const BAD_CREDENTIALS: &str = "Invalid email or password";

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .filter(|u| u.active)
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(BAD_CREDENTIALS.into())))?;

    let matches = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !matches {
        return Err(AppError::Core(CoreError::Unauthorized(
            BAD_CREDENTIALS.into(),
        )));
    }

    let tokens = issue_tokens(&state, user).await?;
    tracing::info!(user_id = tokens.user.id, "User logged in");
    Ok(Json(tokens))
}

/// POST /api/v1/auth/refresh
///
/// Rotates the refresh token: the presented token is revoked and a new
/// pair is issued.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<TokenResponse>> {
    let hash = jwt::hash_refresh_token(&input.refresh_token);
    let session = SessionRepo::find_by_hash(&state.pool, &hash)
        .await?
        .filter(|s| s.is_valid(Utc::now()))
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .filter(|u| u.active)
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account is disabled".into())))?;

    SessionRepo::revoke(&state.pool, &hash).await?;

    let tokens = issue_tokens(&state, user).await?;
    Ok(Json(tokens))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<LogoutRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if input.everywhere {
        let revoked = SessionRepo::revoke_all_for_user(&state.pool, user.user_id).await?;
        tracing::info!(user_id = user.user_id, revoked, "User logged out everywhere");
    } else if let Some(token) = &input.refresh_token {
        SessionRepo::revoke(&state.pool, &jwt::hash_refresh_token(token)).await?;
    }

    Ok(Json(serde_json::json!({ "success": true })))
}

/// GET /api/v1/auth/me
pub async fn me(user: AuthUser, State(state): State<AppState>) -> AppResult<Json<User>> {
    let user = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;
    Ok(Json(user))
}

/// Issue a fresh access/refresh token pair and persist the refresh hash.
async fn issue_tokens(state: &AppState, user: User) -> AppResult<TokenResponse> {
    let access_token = jwt::generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    let (refresh_token, refresh_hash) = jwt::generate_refresh_token();
    let expires_at = Utc::now() + Duration::days(state.config.jwt.refresh_token_expiry_days);
    SessionRepo::create(&state.pool, user.id, &refresh_hash, expires_at).await?;

    Ok(TokenResponse {
        access_token,
        refresh_token,
        user,
    })
}
