//! Price-list catalog entry model and DTOs.

use serde::{Deserialize, Serialize};
use siteledger_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A catalog row from the `price_list_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PriceListItem {
    pub id: DbId,
    pub category: String,
    pub name: String,
    pub description: String,
    /// Unit of measure, e.g. `SF`, `LF`, `EA`, `HR`.
    pub unit: String,
    pub unit_price: f64,
    pub labor_cost: Option<f64>,
    pub material_cost: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PriceListItem {
    /// Lightweight view used by the AI estimate-generation catalog.
    pub fn to_catalog_item(&self) -> siteledger_core::pricing::CatalogItem {
        siteledger_core::pricing::CatalogItem {
            id: self.id,
            category: self.category.clone(),
            name: self.name.clone(),
            unit: self.unit.clone(),
            unit_price: self.unit_price,
        }
    }
}

/// DTO for creating a catalog entry.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePriceListItem {
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
    #[validate(range(min = 0.0))]
    pub unit_price: f64,
    pub labor_cost: Option<f64>,
    pub material_cost: Option<f64>,
}

/// DTO for updating a catalog entry. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePriceListItem {
    pub category: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub unit_price: Option<f64>,
    pub labor_cost: Option<f64>,
    pub material_cost: Option<f64>,
}
