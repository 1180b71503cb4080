//! Integration tests for report generation and export.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, body_string, get_auth, send_json};
use serde_json::json;
use sqlx::PgPool;

fn today() -> String {
    chrono::Utc::now().date_naive().to_string()
}

async fn seed_project_with_expenses(app: &axum::Router, token: &str, name: &str) -> i64 {
    let created = send_json(
        app.clone(),
        Method::POST,
        "/api/v1/projects",
        token,
        &json!({"name": name, "budget": 50000.0}),
    )
    .await;
    let id = body_json(created).await["id"].as_i64().unwrap();

    for (category, amount) in [("FRAMING & ROUGH CARPENTRY", 8000.0), ("ROOFING", 4000.0)] {
        send_json(
            app.clone(),
            Method::POST,
            &format!("/api/v1/projects/{id}/expenses"),
            token,
            &json!({"category": category, "amount": amount, "store": "Supplier",
                    "date": today()}),
        )
        .await;
    }
    id
}

// ---------------------------------------------------------------------------
// Test: generate aggregates budgets and expenses across projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn generate_aggregates_projects(pool: PgPool) {
    let (_user, token) = common::seed_user(&pool).await;
    let app = common::build_test_app(pool).await;

    seed_project_with_expenses(&app, &token, "Site A").await;
    seed_project_with_expenses(&app, &token, "Site B").await;

    let report = send_json(
        app,
        Method::POST,
        "/api/v1/reports/generate",
        &token,
        &json!({"name": "Quarterly financial"}),
    )
    .await;
    assert_eq!(report.status(), StatusCode::CREATED);

    let report = body_json(report).await;
    assert_eq!(report["report_type"], "financial");
    assert_eq!(report["project_count"], 2);
    assert_eq!(report["total_budget"], 100000.0);
    assert_eq!(report["total_expenses"], 24000.0);

    let rows = report["breakdown"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["expenses"], 12000.0);
    assert_eq!(rows[0]["expenses_by_category"]["ROOFING"], 4000.0);
}

// ---------------------------------------------------------------------------
// Test: restricting to a project subset
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn generate_respects_project_subset(pool: PgPool) {
    let (_user, token) = common::seed_user(&pool).await;
    let app = common::build_test_app(pool).await;

    let keep = seed_project_with_expenses(&app, &token, "Included").await;
    seed_project_with_expenses(&app, &token, "Excluded").await;

    let report = send_json(
        app,
        Method::POST,
        "/api/v1/reports/generate",
        &token,
        &json!({"name": "One project", "project_ids": [keep]}),
    )
    .await;
    let report = body_json(report).await;
    assert_eq!(report["project_count"], 1);
    assert_eq!(report["breakdown"][0]["project_name"], "Included");
}

// ---------------------------------------------------------------------------
// Test: CSV export renders the stored breakdown
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn csv_export_renders_rows(pool: PgPool) {
    let (_user, token) = common::seed_user(&pool).await;
    let app = common::build_test_app(pool).await;

    seed_project_with_expenses(&app, &token, "Exported Site").await;

    let report = send_json(
        app.clone(),
        Method::POST,
        "/api/v1/reports/generate",
        &token,
        &json!({"name": "Export me"}),
    )
    .await;
    let id = body_json(report).await["id"].as_i64().unwrap();

    let response = get_auth(app, &format!("/api/v1/reports/{id}/export/csv"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let csv = body_string(response).await;
    assert!(csv.starts_with("Project,Budget,Expenses,Remaining,Status,Progress,"));
    assert!(csv.contains("Exported Site,50000.00,12000.00,38000.00,active,0%,"));
}
