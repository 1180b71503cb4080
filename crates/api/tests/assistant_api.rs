//! Integration tests for the assistant chat and transcript.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, delete_auth, get_auth, send_json};
use httpmock::prelude::*;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: a text turn answers and lands in the transcript
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn text_turn_is_answered_and_persisted(pool: PgPool) {
    let (_user, token) = common::seed_user(&pool).await;
    let llm = MockServer::start();
    let app = common::build_test_app_with_llm(pool, format!("{}/v1", llm.base_url())).await;

    llm.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(json!({
            "choices": [{"message": {"content": "You have 2 active projects."}}]
        }));
    });

    let response = send_json(
        app.clone(),
        Method::POST,
        "/api/v1/assistant/chat",
        &token,
        &json!({"messages": [{"role": "user", "text": "how many active projects?"}]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["type"], "text");
    assert_eq!(body["content"], "You have 2 active projects.");

    // Both sides of the turn are in the transcript, oldest first.
    let history = get_auth(app, "/api/v1/assistant/history", &token).await;
    let history = body_json(history).await;
    let rows = history.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["role"], "user");
    assert_eq!(rows[0]["content"], "how many active projects?");
    assert_eq!(rows[1]["role"], "assistant");
}

// ---------------------------------------------------------------------------
// Test: tool calls are surfaced with parsed arguments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn tool_calls_are_surfaced(pool: PgPool) {
    let (_user, token) = common::seed_user(&pool).await;
    let llm = MockServer::start();
    let app = common::build_test_app_with_llm(pool, format!("{}/v1", llm.base_url())).await;

    llm.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(json!({
            "choices": [{"message": {
                "content": null,
                "tool_calls": [{"id": "call_1", "type": "function",
                    "function": {"name": "list_projects",
                                 "arguments": "{\"status\": \"active\"}"}}]
            }}]
        }));
    });

    let response = send_json(
        app,
        Method::POST,
        "/api/v1/assistant/chat",
        &token,
        &json!({
            "messages": [{"role": "user", "text": "list my projects"}],
            "tools": [{"type": "function",
                       "function": {"name": "list_projects", "description": "List projects",
                                    "parameters": {"type": "object", "properties": {}}}}]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["type"], "tool_calls");
    assert_eq!(body["tool_calls"][0]["name"], "list_projects");
    // Arguments arrive parsed, not as a JSON string.
    assert_eq!(body["tool_calls"][0]["arguments"]["status"], "active");
}

// ---------------------------------------------------------------------------
// Test: clearing the transcript
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn transcript_can_be_cleared(pool: PgPool) {
    let (_user, token) = common::seed_user(&pool).await;
    let llm = MockServer::start();
    let app = common::build_test_app_with_llm(pool, format!("{}/v1", llm.base_url())).await;

    llm.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(json!({
            "choices": [{"message": {"content": "hello"}}]
        }));
    });

    send_json(
        app.clone(),
        Method::POST,
        "/api/v1/assistant/chat",
        &token,
        &json!({"messages": [{"role": "user", "text": "hi"}]}),
    )
    .await;

    let cleared = delete_auth(app.clone(), "/api/v1/assistant/history", &token).await;
    assert_eq!(cleared.status(), StatusCode::OK);
    let cleared = body_json(cleared).await;
    assert_eq!(cleared["deleted"], 2);

    let history = get_auth(app, "/api/v1/assistant/history", &token).await;
    let history = body_json(history).await;
    assert!(history.as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: empty message list answers 400
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_messages_are_rejected(pool: PgPool) {
    let (_user, token) = common::seed_user(&pool).await;
    let app = common::build_test_app(pool).await;

    let response = send_json(
        app,
        Method::POST,
        "/api/v1/assistant/chat",
        &token,
        &json!({"messages": []}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
