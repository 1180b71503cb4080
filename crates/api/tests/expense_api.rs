//! Integration tests for expenses: CRUD, receipt analysis, duplicates.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, get_auth, send_json};
use httpmock::prelude::*;
use serde_json::json;
use sqlx::PgPool;

async fn seed_project(app: &axum::Router, token: &str) -> i64 {
    let created = send_json(
        app.clone(),
        Method::POST,
        "/api/v1/projects",
        token,
        &json!({"name": "Expense Host", "budget": 10000.0}),
    )
    .await;
    body_json(created).await["id"].as_i64().unwrap()
}

fn today() -> String {
    chrono::Utc::now().date_naive().to_string()
}

// ---------------------------------------------------------------------------
// Test: create and list expenses under a project
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_and_list_expenses(pool: PgPool) {
    let (_user, token) = common::seed_user(&pool).await;
    let app = common::build_test_app(pool).await;
    let project_id = seed_project(&app, &token).await;

    let created = send_json(
        app.clone(),
        Method::POST,
        &format!("/api/v1/projects/{project_id}/expenses"),
        &token,
        &json!({"category": "PLUMBING", "subcategory": "Fixtures", "amount": 213.45,
                "store": "Ferguson", "date": today()}),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let listed = get_auth(
        app,
        &format!("/api/v1/projects/{project_id}/expenses"),
        &token,
    )
    .await;
    let listed = body_json(listed).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["store"], "Ferguson");
}

// ---------------------------------------------------------------------------
// Test: expense under a missing project answers 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn expense_under_missing_project_is_404(pool: PgPool) {
    let (_user, token) = common::seed_user(&pool).await;
    let app = common::build_test_app(pool).await;

    let response = send_json(
        app,
        Method::POST,
        "/api/v1/projects/424242/expenses",
        &token,
        &json!({"category": "PLUMBING", "amount": 1.0, "store": "X", "date": today()}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: per-category totals
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn category_totals_aggregate(pool: PgPool) {
    let (_user, token) = common::seed_user(&pool).await;
    let app = common::build_test_app(pool).await;
    let project_id = seed_project(&app, &token).await;

    for (category, amount) in [("ELECTRICAL", 100.0), ("ELECTRICAL", 50.0), ("HVAC", 75.0)] {
        send_json(
            app.clone(),
            Method::POST,
            &format!("/api/v1/projects/{project_id}/expenses"),
            &token,
            &json!({"category": category, "amount": amount, "store": "S", "date": today()}),
        )
        .await;
    }

    let totals = get_auth(
        app,
        &format!("/api/v1/projects/{project_id}/expenses/totals"),
        &token,
    )
    .await;
    let totals = body_json(totals).await;
    // Largest category first.
    assert_eq!(totals[0]["category"], "ELECTRICAL");
    assert_eq!(totals[0]["total"], 150.0);
    assert_eq!(totals[1]["category"], "HVAC");
}

// ---------------------------------------------------------------------------
// Test: duplicate receipt flow -- check, create, exact match, 409 on retry
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_receipt_detection(pool: PgPool) {
    let (_user, token) = common::seed_user(&pool).await;
    let app = common::build_test_app(pool).await;
    let project_id = seed_project(&app, &token).await;

    let image = "data:image/jpeg;base64,c29tZS1yZWNlaXB0LWJ5dGVz";
    let ocr = json!({"store": "Home Depot", "amount": 88.2, "date": today()});

    // First check: clean, hands back the fingerprints to attach.
    let first = send_json(
        app.clone(),
        Method::POST,
        "/api/v1/expenses/check-duplicate",
        &token,
        &json!({"projectId": project_id, "imageBase64": image, "ocrData": ocr}),
    )
    .await;
    let first = body_json(first).await;
    assert_eq!(first["isDuplicate"], false);
    let image_hash = first["imageHash"].as_str().unwrap().to_string();
    let ocr_fingerprint = first["ocrFingerprint"].as_str().unwrap().to_string();

    // Create the expense carrying both fingerprints.
    let created = send_json(
        app.clone(),
        Method::POST,
        &format!("/api/v1/projects/{project_id}/expenses"),
        &token,
        &json!({"category": "ELECTRICAL", "amount": 88.2, "store": "Home Depot",
                "date": today(), "image_hash": image_hash, "ocr_fingerprint": ocr_fingerprint}),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    // Same image again: exact duplicate, cannot override.
    let exact = send_json(
        app.clone(),
        Method::POST,
        "/api/v1/expenses/check-duplicate",
        &token,
        &json!({"projectId": project_id, "imageBase64": image}),
    )
    .await;
    let exact = body_json(exact).await;
    assert_eq!(exact["isDuplicate"], true);
    assert_eq!(exact["duplicateType"], "exact");
    assert_eq!(exact["canOverride"], false);

    // Different image, same OCR fields: similar duplicate, can override.
    let similar = send_json(
        app.clone(),
        Method::POST,
        "/api/v1/expenses/check-duplicate",
        &token,
        &json!({"projectId": project_id,
                "imageBase64": "data:image/jpeg;base64,ZGlmZmVyZW50LWJ5dGVz",
                "ocrData": ocr}),
    )
    .await;
    let similar = body_json(similar).await;
    assert_eq!(similar["isDuplicate"], true);
    assert_eq!(similar["duplicateType"], "similar");
    assert_eq!(similar["canOverride"], true);

    // Insert-time re-check: creating with the same image hash answers 409.
    let conflict = send_json(
        app,
        Method::POST,
        &format!("/api/v1/projects/{project_id}/expenses"),
        &token,
        &json!({"category": "ELECTRICAL", "amount": 88.2, "store": "Home Depot",
                "date": today(), "image_hash": exact["matchedExpense"]["image_hash"]}),
    )
    .await;
    assert_eq!(conflict.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Test: receipt analysis parses model output
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn analyze_receipt_parses_model_output(pool: PgPool) {
    let (_user, token) = common::seed_user(&pool).await;
    let llm = MockServer::start();
    let app = common::build_test_app_with_llm(pool, format!("{}/v1", llm.base_url())).await;

    llm.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(json!({
            "choices": [{"message": {"content":
                "{\"store\":\"Home Depot\",\"amount\":234.56,\"date\":\"2025-05-30\",\
                 \"category\":\"ELECTRICAL\",\"items\":\"wire, breakers\",\"confidence\":92}"
            }}]
        }));
    });

    let response = send_json(
        app,
        Method::POST,
        "/api/v1/expenses/analyze-receipt",
        &token,
        &json!({"imageData": "data:image/jpeg;base64,abc"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["store"], "Home Depot");
    assert_eq!(body["data"]["amount"], 234.56);
    assert_eq!(body["data"]["category"], "ELECTRICAL");
    assert!(body.get("error").is_none());
}

// ---------------------------------------------------------------------------
// Test: unparseable model output still answers 200 with a fallback
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn analyze_receipt_degrades_to_fallback(pool: PgPool) {
    let (_user, token) = common::seed_user(&pool).await;
    let llm = MockServer::start();
    let app = common::build_test_app_with_llm(pool, format!("{}/v1", llm.base_url())).await;

    llm.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(json!({
            "choices": [{"message": {"content": "The image is too blurry to read."}}]
        }));
    });

    let response = send_json(
        app,
        Method::POST,
        "/api/v1/expenses/analyze-receipt",
        &token,
        &json!({"imageData": "data:image/jpeg;base64,abc"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["amount"], 0.0);
    assert_eq!(body["data"]["confidence"], 0);
    assert_eq!(body["data"]["category"], "PRE-CONSTRUCTION");
    assert!(body["error"].as_str().unwrap().contains("manually"));
    assert!(body["rawResponse"].as_str().unwrap().contains("blurry"));
}

// ---------------------------------------------------------------------------
// Test: missing image answers 400, LLM failure answers 502
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn analyze_receipt_error_paths(pool: PgPool) {
    let (_user, token) = common::seed_user(&pool).await;
    let llm = MockServer::start();
    let app = common::build_test_app_with_llm(pool, format!("{}/v1", llm.base_url())).await;

    let missing = send_json(
        app.clone(),
        Method::POST,
        "/api/v1/expenses/analyze-receipt",
        &token,
        &json!({}),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    llm.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(500).body("upstream exploded");
    });

    let upstream = send_json(
        app,
        Method::POST,
        "/api/v1/expenses/analyze-receipt",
        &token,
        &json!({"imageUrl": "https://bucket/receipt.jpg"}),
    )
    .await;
    assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(upstream).await;
    assert_eq!(body["code"], "UPSTREAM_ERROR");
}
