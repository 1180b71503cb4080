//! Repository for the `reports` table.

use chrono::NaiveDate;
use siteledger_core::types::DbId;
use sqlx::PgPool;

use crate::models::report::Report;

const COLUMNS: &str = "id, name, report_type, start_date, end_date, total_budget, \
                       total_expenses, project_count, breakdown, file_url, created_at";

/// Provides persistence for generated reports.
pub struct ReportRepo;

impl ReportRepo {
    /// Insert a generated report with its per-project breakdown.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        pool: &PgPool,
        name: &str,
        report_type: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        total_budget: f64,
        total_expenses: f64,
        project_count: i32,
        breakdown: &serde_json::Value,
    ) -> Result<Report, sqlx::Error> {
        let query = format!(
            "INSERT INTO reports
                (name, report_type, start_date, end_date, total_budget, total_expenses,
                 project_count, breakdown)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(name)
            .bind(report_type)
            .bind(start_date)
            .bind(end_date)
            .bind(total_budget)
            .bind(total_expenses)
            .bind(project_count)
            .bind(breakdown)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Report>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reports WHERE id = $1");
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Report>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reports ORDER BY created_at DESC");
        sqlx::query_as::<_, Report>(&query).fetch_all(pool).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
