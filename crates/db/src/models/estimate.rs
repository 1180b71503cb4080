//! Estimate and estimate-item models and DTOs.
//!
//! Money fields on the estimate row (`subtotal`, `tax_amount`, `total`)
//! and on each item (`total`, `budget_total`) are derived server-side
//! from the items; incoming DTOs never carry them.

use serde::{Deserialize, Serialize};
use siteledger_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// An estimate row from the `estimates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Estimate {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    /// One of `draft`, `sent`, `approved`, `rejected`.
    pub status: String,
    /// Fractional tax rate (`0.0825` for 8.25%).
    pub tax_rate: f64,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An estimate line-item row from the `estimate_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EstimateItem {
    pub id: DbId,
    pub estimate_id: DbId,
    /// Catalog reference; `None` for ad-hoc custom rows.
    pub price_list_item_id: Option<DbId>,
    pub name: String,
    pub unit: String,
    pub category: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    /// Override price; wins over `unit_price` in totals.
    pub custom_price: Option<f64>,
    pub total: f64,
    pub budget_unit_price: Option<f64>,
    pub budget_total: Option<f64>,
    pub notes: Option<String>,
    /// Display order within the estimate.
    pub position: i32,
}

/// An estimate together with its line items, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct EstimateWithItems {
    #[serde(flatten)]
    pub estimate: Estimate,
    pub items: Vec<EstimateItem>,
}

/// DTO for one incoming line item.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEstimateItem {
    pub price_list_item_id: Option<DbId>,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub category: Option<String>,
    #[validate(range(min = 0.0))]
    pub quantity: f64,
    #[validate(range(min = 0.0))]
    pub unit_price: f64,
    pub custom_price: Option<f64>,
    pub budget_unit_price: Option<f64>,
    pub notes: Option<String>,
}

fn default_unit() -> String {
    "EA".to_string()
}

/// DTO for creating a new estimate with its items.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEstimate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Defaults to `0.0` if omitted.
    pub tax_rate: Option<f64>,
    #[validate(nested)]
    #[serde(default)]
    pub items: Vec<CreateEstimateItem>,
}

/// DTO for updating an estimate.
///
/// When `items` is present the full item list is replaced and totals
/// recomputed; when absent only the scalar fields change (totals are
/// still recomputed if `tax_rate` changes).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEstimate {
    pub name: Option<String>,
    pub status: Option<String>,
    pub tax_rate: Option<f64>,
    pub items: Option<Vec<CreateEstimateItem>>,
}

/// A fully-computed line item ready for insertion. Built by the handler
/// layer after running the money math in `siteledger_core::estimate`.
#[derive(Debug, Clone)]
pub struct NewEstimateItem {
    pub price_list_item_id: Option<DbId>,
    pub name: String,
    pub unit: String,
    pub category: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub custom_price: Option<f64>,
    pub total: f64,
    pub budget_unit_price: Option<f64>,
    pub budget_total: Option<f64>,
    pub notes: Option<String>,
    pub position: i32,
}

/// A fully-computed estimate ready for insertion.
#[derive(Debug, Clone)]
pub struct NewEstimate {
    pub project_id: DbId,
    pub name: String,
    pub status: String,
    pub tax_rate: f64,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
    pub items: Vec<NewEstimateItem>,
}
