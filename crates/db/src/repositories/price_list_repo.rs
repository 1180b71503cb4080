//! Repository for the `price_list_items` table.

use siteledger_core::types::DbId;
use sqlx::PgPool;

use crate::models::price_list_item::{CreatePriceListItem, PriceListItem, UpdatePriceListItem};

const COLUMNS: &str = "id, category, name, description, unit, unit_price, labor_cost, \
                       material_cost, created_at, updated_at";

/// Provides CRUD operations for the price catalog.
pub struct PriceListRepo;

impl PriceListRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreatePriceListItem,
    ) -> Result<PriceListItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO price_list_items
                (category, name, description, unit, unit_price, labor_cost, material_cost)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PriceListItem>(&query)
            .bind(&input.category)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.unit)
            .bind(input.unit_price)
            .bind(input.labor_cost)
            .bind(input.material_cost)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PriceListItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM price_list_items WHERE id = $1");
        sqlx::query_as::<_, PriceListItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the full catalog, grouped for display: category then name.
    pub async fn list(pool: &PgPool) -> Result<Vec<PriceListItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM price_list_items ORDER BY category, name");
        sqlx::query_as::<_, PriceListItem>(&query)
            .fetch_all(pool)
            .await
    }

    /// List catalog entries for one category, ordered by name.
    pub async fn list_by_category(
        pool: &PgPool,
        category: &str,
    ) -> Result<Vec<PriceListItem>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM price_list_items WHERE category = $1 ORDER BY name");
        sqlx::query_as::<_, PriceListItem>(&query)
            .bind(category)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePriceListItem,
    ) -> Result<Option<PriceListItem>, sqlx::Error> {
        let query = format!(
            "UPDATE price_list_items SET
                category = COALESCE($2, category),
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                unit = COALESCE($5, unit),
                unit_price = COALESCE($6, unit_price),
                labor_cost = COALESCE($7, labor_cost),
                material_cost = COALESCE($8, material_cost),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PriceListItem>(&query)
            .bind(id)
            .bind(&input.category)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.unit)
            .bind(input.unit_price)
            .bind(input.labor_cost)
            .bind(input.material_cost)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a catalog entry. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM price_list_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
