//! Repository for the `clients` table.

use chrono::NaiveDate;
use siteledger_core::types::DbId;
use sqlx::PgPool;

use crate::models::client::{Client, CreateClient, UpdateClient};

const COLUMNS: &str = "id, name, email, phone, address, source, status, last_contact_date, \
                       next_follow_up_date, created_at, updated_at";

/// Provides CRUD and follow-up queries for CRM clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client. Source defaults to `other`, status to `lead`.
    pub async fn create(pool: &PgPool, input: &CreateClient) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients
                (name, email, phone, address, source, status, last_contact_date, next_follow_up_date)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'other'), COALESCE($6, 'lead'), $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.source)
            .bind(&input.status)
            .bind(input.last_contact_date)
            .bind(input.next_follow_up_date)
            .fetch_one(pool)
            .await
    }

    /// Find a client by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all clients, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients WHERE deleted_at IS NULL ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Client>(&query).fetch_all(pool).await
    }

    /// List clients whose next follow-up is due on or before `due_before`,
    /// soonest first.
    pub async fn list_follow_ups_due(
        pool: &PgPool,
        due_before: NaiveDate,
    ) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients
             WHERE deleted_at IS NULL AND next_follow_up_date IS NOT NULL
               AND next_follow_up_date <= $1
             ORDER BY next_follow_up_date ASC"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(due_before)
            .fetch_all(pool)
            .await
    }

    /// Update a client. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                address = COALESCE($5, address),
                source = COALESCE($6, source),
                status = COALESCE($7, status),
                last_contact_date = COALESCE($8, last_contact_date),
                next_follow_up_date = COALESCE($9, next_follow_up_date),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.source)
            .bind(&input.status)
            .bind(input.last_contact_date)
            .bind(input.next_follow_up_date)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a client by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE clients SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
