//! Handlers for the `/price-list` catalog resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use siteledger_core::error::CoreError;
use siteledger_core::types::DbId;
use siteledger_db::models::price_list_item::{
    CreatePriceListItem, PriceListItem, UpdatePriceListItem,
};
use siteledger_db::repositories::PriceListRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CatalogParams {
    pub category: Option<String>,
}

/// POST /api/v1/price-list
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePriceListItem>,
) -> AppResult<(StatusCode, Json<PriceListItem>)> {
    require_catalog_admin(&user)?;
    input.validate()?;
    let item = PriceListRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /api/v1/price-list?category=
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> AppResult<Json<Vec<PriceListItem>>> {
    let items = match &params.category {
        Some(category) => PriceListRepo::list_by_category(&state.pool, category).await?,
        None => PriceListRepo::list(&state.pool).await?,
    };
    Ok(Json(items))
}

/// GET /api/v1/price-list/{id}
pub async fn get_by_id(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<PriceListItem>> {
    let item = PriceListRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Price list item",
            id,
        }))?;
    Ok(Json(item))
}

/// PUT /api/v1/price-list/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePriceListItem>,
) -> AppResult<Json<PriceListItem>> {
    require_catalog_admin(&user)?;
    let item = PriceListRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Price list item",
            id,
        }))?;
    Ok(Json(item))
}

/// DELETE /api/v1/price-list/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_catalog_admin(&user)?;
    let deleted = PriceListRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Price list item",
            id,
        }))
    }
}

/// Catalog writes are restricted to admins and managers; everyone can read.
fn require_catalog_admin(user: &AuthUser) -> AppResult<()> {
    if user.is_admin() || user.role == "manager" {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Only admins and managers can modify the price list".into(),
        )))
    }
}
