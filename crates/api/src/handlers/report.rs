//! Handlers for report generation and export.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use siteledger_core::error::CoreError;
use siteledger_core::estimate::round_cents;
use siteledger_core::export::{self, ReportRowView};
use siteledger_core::types::DbId;
use siteledger_db::models::report::{GenerateReport, Report, ReportProjectRow};
use siteledger_db::repositories::{ExpenseRepo, ProjectRepo, ReportRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/v1/reports/generate
///
/// Aggregates per-project budget and expense figures (optionally over a
/// date range and a project subset) into a stored report row.
pub async fn generate(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<GenerateReport>,
) -> AppResult<(StatusCode, Json<Report>)> {
    input.validate()?;

    let projects = match &input.project_ids {
        Some(ids) if !ids.is_empty() => ProjectRepo::list_by_ids(&state.pool, ids).await?,
        _ => ProjectRepo::list(&state.pool).await?,
    };

    let mut rows = Vec::with_capacity(projects.len());
    let mut total_budget = 0.0;
    let mut total_expenses = 0.0;

    for project in &projects {
        let by_category = ExpenseRepo::totals_by_category(
            &state.pool,
            project.id,
            input.start_date,
            input.end_date,
        )
        .await?;

        let expenses: f64 = by_category.iter().map(|c| c.total).sum();
        total_budget += project.budget;
        total_expenses += expenses;

        rows.push(ReportProjectRow {
            project_id: project.id,
            project_name: project.name.clone(),
            budget: project.budget,
            expenses: round_cents(expenses),
            status: project.status.clone(),
            progress: project.progress,
            start_date: project.start_date,
            end_date: project.end_date,
            expenses_by_category: by_category
                .into_iter()
                .map(|c| (c.category, round_cents(c.total)))
                .collect(),
        });
    }

    let breakdown = serde_json::to_value(&rows)
        .map_err(|e| AppError::InternalError(format!("Breakdown serialization failed: {e}")))?;

    let report = ReportRepo::create(
        &state.pool,
        &input.name,
        input.report_type.as_deref().unwrap_or("financial"),
        input.start_date,
        input.end_date,
        round_cents(total_budget),
        round_cents(total_expenses),
        rows.len() as i32,
        &breakdown,
    )
    .await?;

    tracing::info!(report_id = report.id, projects = rows.len(), "Report generated");
    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /api/v1/reports
pub async fn list(_user: AuthUser, State(state): State<AppState>) -> AppResult<Json<Vec<Report>>> {
    let reports = ReportRepo::list(&state.pool).await?;
    Ok(Json(reports))
}

/// GET /api/v1/reports/{id}
pub async fn get_by_id(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Report>> {
    let report = require_report(&state, id).await?;
    Ok(Json(report))
}

/// DELETE /api/v1/reports/{id}
pub async fn delete(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ReportRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id,
        }))
    }
}

/// GET /api/v1/reports/{id}/export/csv
pub async fn export_csv(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let report = require_report(&state, id).await?;

    let rows: Vec<ReportProjectRow> = serde_json::from_value(report.breakdown)
        .map_err(|e| AppError::InternalError(format!("Stored breakdown is malformed: {e}")))?;
    let views: Vec<ReportRowView> = rows
        .into_iter()
        .map(|row| ReportRowView {
            project_name: row.project_name,
            budget: row.budget,
            expenses: row.expenses,
            status: row.status,
            progress: row.progress,
            start_date: row.start_date,
            end_date: row.end_date,
        })
        .collect();

    let csv = export::csv::report_csv(&views)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"report.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

async fn require_report(state: &AppState, id: DbId) -> AppResult<Report> {
    ReportRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id,
        }))
}
