//! Repository for the `estimates` and `estimate_items` tables.
//!
//! Estimates and their items are written atomically: creation inserts
//! the document and all rows in one transaction, and a full update
//! replaces the item list wholesale (the UI always sends the complete
//! list).

use siteledger_core::types::DbId;
use sqlx::PgPool;

use crate::models::estimate::{Estimate, EstimateItem, EstimateWithItems, NewEstimate};

const ESTIMATE_COLUMNS: &str = "id, project_id, name, status, tax_rate, subtotal, tax_amount, \
                                total, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, estimate_id, price_list_item_id, name, unit, category, quantity, \
                            unit_price, custom_price, total, budget_unit_price, budget_total, \
                            notes, position";

/// Provides atomic CRUD operations for estimates with their line items.
pub struct EstimateRepo;

impl EstimateRepo {
    /// Insert an estimate and all of its items in one transaction.
    pub async fn create(pool: &PgPool, input: &NewEstimate) -> Result<EstimateWithItems, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO estimates (project_id, name, status, tax_rate, subtotal, tax_amount, total)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {ESTIMATE_COLUMNS}"
        );
        let estimate = sqlx::query_as::<_, Estimate>(&query)
            .bind(input.project_id)
            .bind(&input.name)
            .bind(&input.status)
            .bind(input.tax_rate)
            .bind(input.subtotal)
            .bind(input.tax_amount)
            .bind(input.total)
            .fetch_one(&mut *tx)
            .await?;

        let items = Self::insert_items(&mut tx, estimate.id, input).await?;

        tx.commit().await?;
        Ok(EstimateWithItems { estimate, items })
    }

    /// Find an estimate with its items, ordered by position.
    pub async fn find_with_items(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<EstimateWithItems>, sqlx::Error> {
        let query = format!("SELECT {ESTIMATE_COLUMNS} FROM estimates WHERE id = $1");
        let Some(estimate) = sqlx::query_as::<_, Estimate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM estimate_items WHERE estimate_id = $1 ORDER BY position"
        );
        let items = sqlx::query_as::<_, EstimateItem>(&query)
            .bind(id)
            .fetch_all(pool)
            .await?;

        Ok(Some(EstimateWithItems { estimate, items }))
    }

    /// List a project's estimates (documents only, no items), newest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Estimate>, sqlx::Error> {
        let query = format!(
            "SELECT {ESTIMATE_COLUMNS} FROM estimates WHERE project_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Estimate>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Replace an estimate's scalar fields, totals, and item list in one
    /// transaction. Returns `None` if the estimate does not exist.
    pub async fn replace(
        pool: &PgPool,
        id: DbId,
        input: &NewEstimate,
    ) -> Result<Option<EstimateWithItems>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE estimates SET
                name = $2, status = $3, tax_rate = $4,
                subtotal = $5, tax_amount = $6, total = $7,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {ESTIMATE_COLUMNS}"
        );
        let Some(estimate) = sqlx::query_as::<_, Estimate>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.status)
            .bind(input.tax_rate)
            .bind(input.subtotal)
            .bind(input.tax_amount)
            .bind(input.total)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM estimate_items WHERE estimate_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let items = Self::insert_items(&mut tx, id, input).await?;

        tx.commit().await?;
        Ok(Some(EstimateWithItems { estimate, items }))
    }

    /// Update only the status of an estimate.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Estimate>, sqlx::Error> {
        let query = format!(
            "UPDATE estimates SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {ESTIMATE_COLUMNS}"
        );
        sqlx::query_as::<_, Estimate>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete an estimate (items cascade).
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM estimates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_items(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        estimate_id: DbId,
        input: &NewEstimate,
    ) -> Result<Vec<EstimateItem>, sqlx::Error> {
        let query = format!(
            "INSERT INTO estimate_items
                (estimate_id, price_list_item_id, name, unit, category, quantity, unit_price,
                 custom_price, total, budget_unit_price, budget_total, notes, position)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {ITEM_COLUMNS}"
        );
        let mut items = Vec::with_capacity(input.items.len());
        for item in &input.items {
            let row = sqlx::query_as::<_, EstimateItem>(&query)
                .bind(estimate_id)
                .bind(item.price_list_item_id)
                .bind(&item.name)
                .bind(&item.unit)
                .bind(&item.category)
                .bind(item.quantity)
                .bind(item.unit_price)
                .bind(item.custom_price)
                .bind(item.total)
                .bind(item.budget_unit_price)
                .bind(item.budget_total)
                .bind(&item.notes)
                .bind(item.position)
                .fetch_one(&mut **tx)
                .await?;
            items.push(row);
        }
        Ok(items)
    }
}
