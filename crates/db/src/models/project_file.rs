//! Project file metadata model and DTOs.
//!
//! Rows point at objects in cloud storage; the bytes themselves are
//! uploaded directly by clients via pre-signed URLs.

use serde::{Deserialize, Serialize};
use siteledger_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// File categories, mirroring the app's folder tabs.
pub const FILE_CATEGORIES: [&str; 7] = [
    "receipts",
    "photos",
    "reports",
    "plans",
    "estimates",
    "documentation",
    "other",
];

/// A file-metadata row from the `project_files` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectFile {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub category: String,
    /// MIME type reported at upload time.
    pub file_type: String,
    pub file_size: i64,
    /// Object key in the storage bucket.
    pub storage_key: String,
    pub url: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for saving file metadata after a successful upload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProjectFile {
    #[validate(length(min = 1, max = 300))]
    pub name: String,
    pub category: String,
    #[serde(default = "default_file_type")]
    pub file_type: String,
    #[validate(range(min = 0))]
    pub file_size: i64,
    #[validate(length(min = 1))]
    pub storage_key: String,
    #[validate(url)]
    pub url: String,
    pub notes: Option<String>,
}

fn default_file_type() -> String {
    "application/octet-stream".to_string()
}

/// DTO for updating file metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProjectFile {
    pub name: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
}
