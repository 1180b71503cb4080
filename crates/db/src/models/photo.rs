//! Project photo model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use siteledger_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A photo row from the `photos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Photo {
    pub id: DbId,
    pub project_id: DbId,
    pub category: String,
    pub notes: String,
    pub url: String,
    pub date: NaiveDate,
    pub created_at: Timestamp,
}

/// DTO for attaching a photo to a project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePhoto {
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[serde(default)]
    pub notes: String,
    #[validate(url)]
    pub url: String,
    pub date: NaiveDate,
}

/// DTO for updating a photo's metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePhoto {
    pub category: Option<String>,
    pub notes: Option<String>,
}
