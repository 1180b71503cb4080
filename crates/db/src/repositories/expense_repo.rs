//! Repository for the `expenses` table, including the duplicate-receipt
//! lookups.

use chrono::NaiveDate;
use siteledger_core::types::DbId;
use sqlx::PgPool;

use crate::models::expense::{CategoryTotal, CreateExpense, Expense, UpdateExpense};

const COLUMNS: &str = "id, project_id, category, subcategory, amount, store, date, receipt_url, \
                       image_hash, ocr_fingerprint, created_at, updated_at";

/// Provides CRUD and duplicate-detection queries for expenses.
pub struct ExpenseRepo;

impl ExpenseRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateExpense,
    ) -> Result<Expense, sqlx::Error> {
        let query = format!(
            "INSERT INTO expenses
                (project_id, category, subcategory, amount, store, date, receipt_url,
                 image_hash, ocr_fingerprint)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(project_id)
            .bind(&input.category)
            .bind(&input.subcategory)
            .bind(input.amount)
            .bind(&input.store)
            .bind(input.date)
            .bind(&input.receipt_url)
            .bind(&input.image_hash)
            .bind(&input.ocr_fingerprint)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Expense>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM expenses WHERE id = $1");
        sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's expenses, newest receipt date first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Expense>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM expenses WHERE project_id = $1
             ORDER BY date DESC, created_at DESC"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Exact-duplicate lookup: any expense carrying the same receipt-image
    /// hash, across all projects.
    pub async fn find_by_image_hash(
        pool: &PgPool,
        image_hash: &str,
    ) -> Result<Option<Expense>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM expenses WHERE image_hash = $1 LIMIT 1");
        sqlx::query_as::<_, Expense>(&query)
            .bind(image_hash)
            .fetch_optional(pool)
            .await
    }

    /// Similar-duplicate lookup: same OCR fingerprint within the same
    /// project, no older than `cutoff`.
    pub async fn find_similar(
        pool: &PgPool,
        project_id: DbId,
        ocr_fingerprint: &str,
        cutoff: NaiveDate,
    ) -> Result<Option<Expense>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM expenses
             WHERE project_id = $1 AND ocr_fingerprint = $2 AND date >= $3
             LIMIT 1"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(project_id)
            .bind(ocr_fingerprint)
            .bind(cutoff)
            .fetch_optional(pool)
            .await
    }

    /// Per-category totals for a project, optionally bounded by receipt date.
    pub async fn totals_by_category(
        pool: &PgPool,
        project_id: DbId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<CategoryTotal>, sqlx::Error> {
        sqlx::query_as::<_, CategoryTotal>(
            "SELECT category, SUM(amount)::double precision AS total
             FROM expenses
             WHERE project_id = $1
               AND ($2::date IS NULL OR date >= $2)
               AND ($3::date IS NULL OR date <= $3)
             GROUP BY category
             ORDER BY total DESC",
        )
        .bind(project_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateExpense,
    ) -> Result<Option<Expense>, sqlx::Error> {
        let query = format!(
            "UPDATE expenses SET
                category = COALESCE($2, category),
                subcategory = COALESCE($3, subcategory),
                amount = COALESCE($4, amount),
                store = COALESCE($5, store),
                date = COALESCE($6, date),
                receipt_url = COALESCE($7, receipt_url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .bind(&input.category)
            .bind(&input.subcategory)
            .bind(input.amount)
            .bind(&input.store)
            .bind(input.date)
            .bind(&input.receipt_url)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete an expense. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
