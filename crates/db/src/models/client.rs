//! CRM client entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use siteledger_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A client row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    /// Lead source: `google`, `referral`, `ad`, or `other`.
    pub source: String,
    /// Pipeline status: `lead`, `project`, or `completed`.
    pub status: String,
    pub last_contact_date: Option<NaiveDate>,
    pub next_follow_up_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClient {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 40))]
    pub phone: String,
    pub address: Option<String>,
    /// Defaults to `other` if omitted.
    pub source: Option<String>,
    /// Defaults to `lead` if omitted.
    pub status: Option<String>,
    pub last_contact_date: Option<NaiveDate>,
    pub next_follow_up_date: Option<NaiveDate>,
}

/// DTO for updating an existing client. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub source: Option<String>,
    pub status: Option<String>,
    pub last_contact_date: Option<NaiveDate>,
    pub next_follow_up_date: Option<NaiveDate>,
}
