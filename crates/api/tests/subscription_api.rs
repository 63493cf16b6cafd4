//! HTTP-level integration tests for subscription registration.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, post_json};
use serde_json::json;
use sqlx::PgPool;

async fn seed_municipality(pool: &PgPool, name: &str, mid: i64) -> i64 {
    sqlx::query_scalar("INSERT INTO municipalities (name, mid) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(mid)
        .fetch_one(pool)
        .await
        .expect("seed municipality")
}

// ---------------------------------------------------------------------------
// Test: POST /api/v1/subscriptions with IDs creates one row per ID
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn register_with_ids_returns_created(pool: PgPool) {
    let lj = seed_municipality(&pool, "Ljubljana", 1).await;
    let mb = seed_municipality(&pool, "Maribor", 2).await;

    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/subscriptions",
        json!({
            "gcm_token": "token-1",
            "municipality_ids": [lj, mb],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["data"]["inserted"], 2);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 2);
}

// ---------------------------------------------------------------------------
// Test: POST /api/v1/subscriptions without IDs subscribes to everything
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn register_without_ids_subscribes_to_all(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/subscriptions",
        json!({ "gcm_token": "token-2" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["data"]["inserted"], 1);
}

// ---------------------------------------------------------------------------
// Test: empty token is rejected with 400
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn empty_token_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/subscriptions",
        json!({ "gcm_token": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .contains("gcm_token"),
        "error should name the offending field, got: {body}"
    );
}

// ---------------------------------------------------------------------------
// Test: unknown municipality ID violates the foreign key and maps to 500
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn unknown_municipality_id_fails(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/subscriptions",
        json!({
            "gcm_token": "token-3",
            "municipality_ids": [999],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
