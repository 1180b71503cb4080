//! Generated report model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use siteledger_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A report row from the `reports` table.
///
/// `breakdown` holds the per-project rows as JSON; the shape is opaque
/// to the database and rendered by the export layer.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Report {
    pub id: DbId,
    pub name: String,
    /// One of `administrative`, `financial`, `time-tracking`, `custom`.
    pub report_type: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_budget: f64,
    pub total_expenses: f64,
    pub project_count: i32,
    pub breakdown: serde_json::Value,
    pub file_url: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for generating a report.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateReport {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Defaults to `financial` if omitted.
    pub report_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Restrict to these projects; all projects when omitted.
    pub project_ids: Option<Vec<DbId>>,
}

/// One per-project row stored inside `breakdown`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProjectRow {
    pub project_id: DbId,
    pub project_name: String,
    pub budget: f64,
    pub expenses: f64,
    pub status: String,
    pub progress: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Expense totals keyed by construction category.
    pub expenses_by_category: std::collections::BTreeMap<String, f64>,
}
