//! Admin handlers for user management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use siteledger_core::error::CoreError;
use siteledger_core::types::DbId;
use siteledger_db::models::user::{CreateUser, UpdateUser, User};
use siteledger_db::repositories::{SessionRepo, UserRepo};
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const ROLES: [&str; 4] = ["admin", "manager", "employee", "sales"];

/// POST /api/v1/users (admin only)
pub async fn create(
    admin: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    require_admin(&admin)?;
    input.validate()?;
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    if !ROLES.contains(&input.role.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown role: {}",
            input.role
        ))));
    }

    let hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;
    let user = UserRepo::create(&state.pool, &input.name, &input.email, &input.role, &hash).await?;

    tracing::info!(user_id = user.id, role = %user.role, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users (admin only)
pub async fn list(
    admin: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<User>>> {
    require_admin(&admin)?;
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users))
}

/// PUT /api/v1/users/{id} (admin only)
///
/// Deactivating a user also revokes all of their refresh tokens, so the
/// account is locked out as soon as the access token expires.
pub async fn update(
    admin: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<User>> {
    require_admin(&admin)?;
    if let Some(role) = &input.role {
        if !ROLES.contains(&role.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown role: {role}"
            ))));
        }
    }

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    if input.active == Some(false) {
        let revoked = SessionRepo::revoke_all_for_user(&state.pool, id).await?;
        tracing::info!(user_id = id, revoked, "Deactivated user sessions revoked");
    }

    Ok(Json(user))
}

fn require_admin(user: &AuthUser) -> AppResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Only admins can manage users".into(),
        )))
    }
}
