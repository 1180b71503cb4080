//! Handlers for estimates: CRUD, AI item generation, and exports.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use siteledger_ai::estimate::generate_items;
use siteledger_core::error::CoreError;
use siteledger_core::estimate::{compute_totals, line_total, round_cents};
use siteledger_core::export::{self, EstimateLineView, EstimateView};
use siteledger_core::pricing::PriceCatalog;
use siteledger_core::types::DbId;
use siteledger_db::models::estimate::{
    CreateEstimate, CreateEstimateItem, Estimate, EstimateWithItems, NewEstimate, NewEstimateItem,
    UpdateEstimate,
};
use siteledger_db::repositories::{EstimateRepo, PriceListRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::project::require_project;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{project_id}/estimates
pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateEstimate>,
) -> AppResult<(StatusCode, Json<EstimateWithItems>)> {
    input.validate()?;
    require_project(&state, project_id).await?;

    let new_estimate = build_new_estimate(
        project_id,
        input.name,
        "draft".to_string(),
        input.tax_rate.unwrap_or(0.0),
        &input.items,
    )?;
    let created = EstimateRepo::create(&state.pool, &new_estimate).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/projects/{project_id}/estimates
pub async fn list_by_project(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Estimate>>> {
    require_project(&state, project_id).await?;
    let estimates = EstimateRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(estimates))
}

/// GET /api/v1/estimates/{id}
pub async fn get_by_id(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<EstimateWithItems>> {
    let estimate = require_estimate(&state, id).await?;
    Ok(Json(estimate))
}

/// PUT /api/v1/estimates/{id}
///
/// When `items` is present the item list is replaced; totals are always
/// recomputed from whatever item list ends up current.
pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEstimate>,
) -> AppResult<Json<EstimateWithItems>> {
    let existing = require_estimate(&state, id).await?;

    let items: Vec<CreateEstimateItem> = match input.items {
        Some(items) => items,
        None => existing.items.iter().map(to_create_item).collect(),
    };
    let new_estimate = build_new_estimate(
        existing.estimate.project_id,
        input.name.unwrap_or(existing.estimate.name),
        input.status.unwrap_or(existing.estimate.status),
        input.tax_rate.unwrap_or(existing.estimate.tax_rate),
        &items,
    )?;

    let updated = EstimateRepo::replace(&state.pool, id, &new_estimate)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Estimate",
            id,
        }))?;
    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

/// PUT /api/v1/estimates/{id}/status
pub async fn set_status(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetStatusRequest>,
) -> AppResult<Json<Estimate>> {
    let estimate = EstimateRepo::set_status(&state.pool, id, &input.status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Estimate",
            id,
        }))?;
    Ok(Json(estimate))
}

/// DELETE /api/v1/estimates/{id}
pub async fn delete(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = EstimateRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Estimate",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// AI item generation
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GenerateItemsRequest {
    /// Free-text description of the work; may name a budget figure.
    pub prompt: String,
    /// Plan/photo image URLs attached to the request.
    #[serde(default)]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateItemsResponse {
    #[serde(flatten)]
    pub estimate: EstimateWithItems,
    /// Budget figure extracted from the prompt, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    /// Number of generated items dropped to fit the budget.
    pub trimmed: usize,
}

/// POST /api/v1/estimates/{id}/generate-items
///
/// Replaces the estimate's item list with AI-generated, catalog-priced
/// items and recomputes the totals.
pub async fn generate(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<GenerateItemsRequest>,
) -> AppResult<Json<GenerateItemsResponse>> {
    if input.prompt.trim().is_empty() {
        return Err(AppError::BadRequest("Prompt must not be empty".into()));
    }
    let existing = require_estimate(&state, id).await?;

    let catalog = load_catalog(&state).await?;
    if catalog.is_empty() {
        return Err(AppError::BadRequest(
            "Price list is empty; add catalog items before generating".into(),
        ));
    }

    let outcome = generate_items(&state.llm, &catalog, &input.prompt, input.image_urls).await?;

    let items: Vec<CreateEstimateItem> = outcome
        .items
        .iter()
        .map(|item| CreateEstimateItem {
            price_list_item_id: Some(item.price_list_item_id),
            name: item.name.clone(),
            unit: item.unit.clone(),
            category: catalog
                .get(item.price_list_item_id)
                .map(|entry| entry.category.clone()),
            quantity: item.quantity,
            unit_price: item.unit_price,
            custom_price: None,
            budget_unit_price: None,
            notes: item.notes.clone(),
        })
        .collect();

    let new_estimate = build_new_estimate(
        existing.estimate.project_id,
        existing.estimate.name,
        existing.estimate.status,
        existing.estimate.tax_rate,
        &items,
    )?;
    let updated = EstimateRepo::replace(&state.pool, id, &new_estimate)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Estimate",
            id,
        }))?;

    Ok(Json(GenerateItemsResponse {
        estimate: updated,
        budget: outcome.budget,
        trimmed: outcome.trimmed,
    }))
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

/// GET /api/v1/estimates/{id}/export/csv
pub async fn export_csv(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let estimate = require_estimate(&state, id).await?;
    let csv = export::csv::estimate_csv(&to_view(&estimate))?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"estimate.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

/// GET /api/v1/estimates/{id}/export/html
pub async fn export_html(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let estimate = require_estimate(&state, id).await?;
    let html = export::html::estimate_html(&to_view(&estimate), &state.config.company_name);
    Ok(([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html).into_response())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn require_estimate(state: &AppState, id: DbId) -> AppResult<EstimateWithItems> {
    EstimateRepo::find_with_items(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Estimate",
            id,
        }))
}

/// Load the full price catalog for generation.
async fn load_catalog(state: &AppState) -> AppResult<PriceCatalog> {
    let rows = PriceListRepo::list(&state.pool).await?;
    Ok(PriceCatalog::new(
        rows.iter().map(|row| row.to_catalog_item()).collect(),
    ))
}

/// Run the money math over incoming items and assemble the insert payload.
fn build_new_estimate(
    project_id: DbId,
    name: String,
    status: String,
    tax_rate: f64,
    items: &[CreateEstimateItem],
) -> AppResult<NewEstimate> {
    if !(0.0..=1.0).contains(&tax_rate) {
        return Err(AppError::Core(CoreError::Validation(
            "tax_rate must be a fraction between 0 and 1".into(),
        )));
    }

    let new_items: Vec<NewEstimateItem> = items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let total = line_total(item.quantity, item.unit_price, item.custom_price);
            let budget_total = item
                .budget_unit_price
                .map(|budget_price| round_cents(item.quantity * budget_price));
            NewEstimateItem {
                price_list_item_id: item.price_list_item_id,
                name: item.name.clone(),
                unit: item.unit.clone(),
                category: item.category.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                custom_price: item.custom_price,
                total,
                budget_unit_price: item.budget_unit_price,
                budget_total,
                notes: item.notes.clone(),
                position: position as i32,
            }
        })
        .collect();

    let line_totals: Vec<f64> = new_items.iter().map(|item| item.total).collect();
    let totals = compute_totals(&line_totals, tax_rate);

    Ok(NewEstimate {
        project_id,
        name,
        status,
        tax_rate,
        subtotal: totals.subtotal,
        tax_amount: totals.tax_amount,
        total: totals.total,
        items: new_items,
    })
}

/// Round-trip an existing row back into the create DTO shape, for
/// updates that keep the current items.
fn to_create_item(item: &siteledger_db::models::estimate::EstimateItem) -> CreateEstimateItem {
    CreateEstimateItem {
        price_list_item_id: item.price_list_item_id,
        name: item.name.clone(),
        unit: item.unit.clone(),
        category: item.category.clone(),
        quantity: item.quantity,
        unit_price: item.unit_price,
        custom_price: item.custom_price,
        budget_unit_price: item.budget_unit_price,
        notes: item.notes.clone(),
    }
}

fn to_view(estimate: &EstimateWithItems) -> EstimateView {
    EstimateView {
        name: estimate.estimate.name.clone(),
        status: estimate.estimate.status.clone(),
        created_date: estimate.estimate.created_at.date_naive(),
        items: estimate
            .items
            .iter()
            .map(|item| EstimateLineView {
                name: item.name.clone(),
                category: item.category.clone(),
                unit: item.unit.clone(),
                quantity: item.quantity,
                unit_price: item.custom_price.unwrap_or(item.unit_price),
                total: item.total,
                notes: item.notes.clone(),
            })
            .collect(),
        subtotal: estimate.estimate.subtotal,
        tax_rate: estimate.estimate.tax_rate,
        tax_amount: estimate.estimate.tax_amount,
        total: estimate.estimate.total,
    }
}
