//! Handlers for expenses: CRUD, receipt analysis, and duplicate checks.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use siteledger_ai::receipt::analyze_receipt;
use siteledger_core::categories::EXPENSE_CATEGORIES;
use siteledger_core::error::CoreError;
use siteledger_core::extraction::ReceiptFields;
use siteledger_core::fingerprint::{self, SIMILAR_WINDOW_DAYS};
use siteledger_core::types::DbId;
use siteledger_db::models::expense::{CategoryTotal, CreateExpense, Expense, UpdateExpense};
use siteledger_db::repositories::ExpenseRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::project::require_project;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{project_id}/expenses
///
/// Re-checks the receipt image hash right before insert so the
/// duplicate check cannot be bypassed by racing it; a hit answers 409
/// with the conflicting expense.
pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateExpense>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    input.validate()?;
    require_project(&state, project_id).await?;

    if let Some(hash) = &input.image_hash {
        if let Some(existing) = ExpenseRepo::find_by_image_hash(&state.pool, hash).await? {
            tracing::info!(expense_id = existing.id, "Duplicate receipt blocked at insert");
            return Err(AppError::Core(CoreError::Conflict(format!(
                "This receipt has already been added (expense {}, {} ${:.2})",
                existing.id, existing.store, existing.amount,
            ))));
        }
    }

    let expense = ExpenseRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// GET /api/v1/projects/{project_id}/expenses
pub async fn list_by_project(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Expense>>> {
    require_project(&state, project_id).await?;
    let expenses = ExpenseRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(expenses))
}

#[derive(Debug, Deserialize)]
pub struct TotalsParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// GET /api/v1/projects/{project_id}/expenses/totals
pub async fn totals_by_category(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<TotalsParams>,
) -> AppResult<Json<Vec<CategoryTotal>>> {
    require_project(&state, project_id).await?;
    let totals = ExpenseRepo::totals_by_category(
        &state.pool,
        project_id,
        params.start_date,
        params.end_date,
    )
    .await?;
    Ok(Json(totals))
}

/// GET /api/v1/expenses/{id}
pub async fn get_by_id(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Expense>> {
    let expense = ExpenseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Expense",
            id,
        }))?;
    Ok(Json(expense))
}

/// PUT /api/v1/expenses/{id}
pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateExpense>,
) -> AppResult<Json<Expense>> {
    let expense = ExpenseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Expense",
            id,
        }))?;
    Ok(Json(expense))
}

/// DELETE /api/v1/expenses/{id}
pub async fn delete(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ExpenseRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Expense",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Receipt analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeReceiptRequest {
    /// Base64 data URL of the receipt image.
    pub image_data: Option<String>,
    /// Alternatively, an `https://` URL of an already-uploaded image.
    pub image_url: Option<String>,
    /// Custom classification categories; defaults to the construction list.
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeReceiptResponse {
    pub success: bool,
    pub data: ReceiptFields,
    /// Advisory message when the model output could not be parsed and
    /// `data` holds the zero-confidence fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

/// POST /api/v1/expenses/analyze-receipt
///
/// Best-effort by contract: an unreadable model response still answers
/// 200 with fallback fields and an advisory `error` string. Transport
/// and API failures answer 502.
pub async fn analyze(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AnalyzeReceiptRequest>,
) -> AppResult<Json<AnalyzeReceiptResponse>> {
    let image = input
        .image_url
        .as_deref()
        .or(input.image_data.as_deref())
        .ok_or_else(|| AppError::BadRequest("No image data or URL provided".into()))?;

    let custom: Vec<&str> = match &input.categories {
        Some(list) if !list.is_empty() => list.iter().map(String::as_str).collect(),
        _ => EXPENSE_CATEGORIES.to_vec(),
    };

    let analysis = analyze_receipt(&state.llm, image, &custom, Utc::now().date_naive()).await?;

    Ok(Json(AnalyzeReceiptResponse {
        success: true,
        data: analysis.fields,
        error: analysis.parse_failed.then(|| {
            "Could not parse receipt automatically. Please enter details manually.".to_string()
        }),
        raw_response: analysis.raw_response,
    }))
}

// ---------------------------------------------------------------------------
// Duplicate check
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckDuplicateRequest {
    pub project_id: DbId,
    /// Base64 receipt image; the check is skipped when absent.
    pub image_base64: Option<String>,
    /// OCR fields, enabling the similar-duplicate check.
    pub ocr_data: Option<OcrData>,
}

#[derive(Debug, Deserialize)]
pub struct OcrData {
    pub store: String,
    pub amount: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCheckResponse {
    pub is_duplicate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_expense: Option<Expense>,
    pub can_override: bool,
    pub message: String,
    /// Fingerprints the client should attach when it proceeds to create
    /// the expense.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_fingerprint: Option<String>,
}

/// POST /api/v1/expenses/check-duplicate
///
/// Exact duplicates (same image hash, any project) cannot be overridden;
/// similar duplicates (same store/amount/date fingerprint in the same
/// project within 90 days) can.
pub async fn check_duplicate(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CheckDuplicateRequest>,
) -> AppResult<Json<DuplicateCheckResponse>> {
    require_project(&state, input.project_id).await?;

    let Some(image_base64) = &input.image_base64 else {
        return Ok(Json(DuplicateCheckResponse {
            is_duplicate: false,
            duplicate_type: None,
            matched_expense: None,
            can_override: true,
            message: "No image provided".into(),
            image_hash: None,
            ocr_fingerprint: None,
        }));
    };

    let image_hash = fingerprint::image_hash(image_base64);

    if let Some(exact) = ExpenseRepo::find_by_image_hash(&state.pool, &image_hash).await? {
        return Ok(Json(DuplicateCheckResponse {
            is_duplicate: true,
            duplicate_type: Some("exact"),
            matched_expense: Some(exact),
            can_override: false,
            message: "This receipt has already been added. You cannot add the same receipt image twice.".into(),
            image_hash: Some(image_hash),
            ocr_fingerprint: None,
        }));
    }

    let ocr_fingerprint = input
        .ocr_data
        .as_ref()
        .filter(|ocr| !ocr.store.is_empty() && ocr.amount > 0.0)
        .map(|ocr| fingerprint::ocr_fingerprint(&ocr.store, ocr.amount, ocr.date));

    if let Some(fp) = &ocr_fingerprint {
        let cutoff = Utc::now().date_naive() - Duration::days(SIMILAR_WINDOW_DAYS);
        if let Some(similar) =
            ExpenseRepo::find_similar(&state.pool, input.project_id, fp, cutoff).await?
        {
            return Ok(Json(DuplicateCheckResponse {
                is_duplicate: true,
                duplicate_type: Some("similar"),
                matched_expense: Some(similar),
                can_override: true,
                message: "A receipt with the same store, amount, and date already exists. Add anyway?".into(),
                image_hash: Some(image_hash),
                ocr_fingerprint: ocr_fingerprint.clone(),
            }));
        }
    }

    Ok(Json(DuplicateCheckResponse {
        is_duplicate: false,
        duplicate_type: None,
        matched_expense: None,
        can_override: true,
        message: "No duplicate found".into(),
        image_hash: Some(image_hash),
        ocr_fingerprint,
    }))
}
