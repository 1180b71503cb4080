//! Expense entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use siteledger_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// An expense row from the `expenses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Expense {
    pub id: DbId,
    pub project_id: DbId,
    /// Construction trade category (see `siteledger_core::categories`).
    pub category: String,
    pub subcategory: String,
    pub amount: f64,
    pub store: String,
    pub date: NaiveDate,
    pub receipt_url: Option<String>,
    /// SHA-256 of the receipt image, for exact-duplicate detection.
    pub image_hash: Option<String>,
    /// Normalized store/amount/date fingerprint, for similar-duplicate detection.
    pub ocr_fingerprint: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new expense.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateExpense {
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[validate(range(min = 0.0))]
    pub amount: f64,
    #[validate(length(min = 1, max = 200))]
    pub store: String,
    pub date: NaiveDate,
    pub receipt_url: Option<String>,
    pub image_hash: Option<String>,
    pub ocr_fingerprint: Option<String>,
}

/// DTO for updating an existing expense. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateExpense {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub amount: Option<f64>,
    pub store: Option<String>,
    pub date: Option<NaiveDate>,
    pub receipt_url: Option<String>,
}

/// Per-category expense totals for a project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}
