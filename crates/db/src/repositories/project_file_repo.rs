//! Repository for the `project_files` table.

use siteledger_core::types::DbId;
use sqlx::PgPool;

use crate::models::project_file::{CreateProjectFile, ProjectFile, UpdateProjectFile};

const COLUMNS: &str = "id, project_id, name, category, file_type, file_size, storage_key, url, \
                       notes, created_at, updated_at";

/// Provides CRUD operations for project file metadata.
pub struct ProjectFileRepo;

impl ProjectFileRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateProjectFile,
    ) -> Result<ProjectFile, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_files
                (project_id, name, category, file_type, file_size, storage_key, url, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.file_type)
            .bind(input.file_size)
            .bind(&input.storage_key)
            .bind(&input.url)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// List a project's files, optionally filtered by category, newest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        category: Option<&str>,
    ) -> Result<Vec<ProjectFile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_files
             WHERE project_id = $1 AND ($2::text IS NULL OR category = $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(project_id)
            .bind(category)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProjectFile,
    ) -> Result<Option<ProjectFile>, sqlx::Error> {
        let query = format!(
            "UPDATE project_files SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                notes = COALESCE($4, notes),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_files WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
