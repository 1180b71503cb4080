//! Integration tests for login, refresh, and token enforcement.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: login with valid credentials returns a token pair
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_returns_token_pair(pool: PgPool) {
    let (_user_id, _token) = common::seed_user(&pool).await;
    let app = common::build_test_app(pool).await;

    let response = post_json(
        app,
        "/api/v1/auth/login",
        &json!({"email": "manager@example.test", "password": "builder-passw0rd!"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["user"]["email"], "manager@example.test");
    // The password hash must never appear in a response.
    assert!(json["user"].get("password_hash").is_none());
}

// ---------------------------------------------------------------------------
// Test: wrong password and unknown email both answer the same 401
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn bad_credentials_are_indistinguishable(pool: PgPool) {
    common::seed_user(&pool).await;
    let app = common::build_test_app(pool.clone()).await;

    let wrong_password = post_json(
        app.clone(),
        "/api/v1/auth/login",
        &json!({"email": "manager@example.test", "password": "nope"}),
    )
    .await;
    let unknown_email = post_json(
        app,
        "/api/v1/auth/login",
        &json!({"email": "ghost@example.test", "password": "nope"}),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let a = body_json(wrong_password).await;
    let b = body_json(unknown_email).await;
    assert_eq!(a["error"], b["error"]);
}

// ---------------------------------------------------------------------------
// Test: refresh rotates the token
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_rotates_the_refresh_token(pool: PgPool) {
    common::seed_user(&pool).await;
    let app = common::build_test_app(pool.clone()).await;

    let login = post_json(
        app.clone(),
        "/api/v1/auth/login",
        &json!({"email": "manager@example.test", "password": "builder-passw0rd!"}),
    )
    .await;
    let login_body = body_json(login).await;
    let refresh_token = login_body["refresh_token"].as_str().unwrap().to_string();

    // First refresh succeeds and hands out a different token.
    let refresh = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        &json!({"refresh_token": refresh_token}),
    )
    .await;
    assert_eq!(refresh.status(), StatusCode::OK);
    let refresh_body = body_json(refresh).await;
    assert_ne!(refresh_body["refresh_token"], login_body["refresh_token"]);

    // The old token is now revoked.
    let replay = post_json(
        app,
        "/api/v1/auth/refresh",
        &json!({"refresh_token": refresh_token}),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Test: /auth/me returns the current user
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_returns_the_authenticated_user(pool: PgPool) {
    let (user_id, token) = common::seed_user(&pool).await;
    let app = common::build_test_app(pool).await;

    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], user_id);
    assert_eq!(json["role"], "manager");
}

// ---------------------------------------------------------------------------
// Test: a garbage token is rejected
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn garbage_token_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let response = get_auth(app, "/api/v1/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
