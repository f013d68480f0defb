//! HTTP-level integration tests for the `/activity` resource: monthly
//! targets and the dashboard summary.

mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Utc};
use common::{
    admin_with_token, agent_with_token, body_json, build_test_app, delete_auth, get_auth,
    post_json_auth, put_json_auth,
};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a monthly target via the API (as admin) and return its id.
async fn seed_target(pool: &PgPool, token: &str, year: i32, month: i32, amount: f64) -> i64 {
    let app = build_test_app(pool.clone());
    let body = json!({ "year": year, "month": month, "target_amount": amount });
    let response = post_json_auth(app, "/api/activity/targets", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// Only admins can create a target.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_target_requires_admin(pool: PgPool) {
    let (_agent, agent_token) = agent_with_token(&pool).await;

    let app = build_test_app(pool);
    let body = json!({ "year": 2026, "month": 3, "target_amount": 500_000.0 });
    let response = post_json_auth(app, "/api/activity/targets", body, &agent_token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

/// Admin creates a target and gets it echoed back.
#[sqlx::test(migrations = "../db/migrations")]
async fn admin_creates_target(pool: PgPool) {
    let (_admin, admin_token) = admin_with_token(&pool).await;

    let app = build_test_app(pool);
    let body = json!({
        "year": 2026,
        "month": 3,
        "target_amount": 500_000.0,
        "notes": "Spring campaign"
    });
    let response = post_json_auth(app, "/api/activity/targets", body, &admin_token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["year"], 2026);
    assert_eq!(json["month"], 3);
    assert_eq!(json["target_amount"], 500_000.0);
    assert_eq!(json["notes"], "Spring campaign");
}

/// `(year, month)` is unique.
#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_target_month_returns_409(pool: PgPool) {
    let (_admin, admin_token) = admin_with_token(&pool).await;
    seed_target(&pool, &admin_token, 2026, 3, 500_000.0).await;

    let app = build_test_app(pool);
    let body = json!({ "year": 2026, "month": 3, "target_amount": 750_000.0 });
    let response = post_json_auth(app, "/api/activity/targets", body, &admin_token).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

/// Calendar bounds are enforced before hitting the database.
#[sqlx::test(migrations = "../db/migrations")]
async fn target_calendar_bounds_are_enforced(pool: PgPool) {
    let (_admin, admin_token) = admin_with_token(&pool).await;

    for body in [
        json!({ "year": 2026, "month": 13, "target_amount": 1.0 }),
        json!({ "year": 2026, "month": 0, "target_amount": 1.0 }),
        json!({ "year": 1999, "month": 6, "target_amount": 1.0 }),
        json!({ "year": 2026, "month": 6, "target_amount": -5.0 }),
    ] {
        let app = build_test_app(pool.clone());
        let response = post_json_auth(app, "/api/activity/targets", body.clone(), &admin_token).await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "body {body} should be rejected"
        );
    }
}

/// Listing supports an optional year filter.
#[sqlx::test(migrations = "../db/migrations")]
async fn list_targets_filters_by_year(pool: PgPool) {
    let (_admin, admin_token) = admin_with_token(&pool).await;
    seed_target(&pool, &admin_token, 2026, 1, 100_000.0).await;
    seed_target(&pool, &admin_token, 2026, 2, 200_000.0).await;
    seed_target(&pool, &admin_token, 2027, 1, 300_000.0).await;

    let app = build_test_app(pool.clone());
    let response = get_auth(app, "/api/activity/targets", &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 3);

    let app = build_test_app(pool);
    let response = get_auth(app, "/api/activity/targets?year=2026", &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let targets = json.as_array().unwrap();
    assert_eq!(targets.len(), 2);
    assert!(targets.iter().all(|t| t["year"] == 2026));
}

/// Target updates are partial and admin-only.
#[sqlx::test(migrations = "../db/migrations")]
async fn update_target_is_partial_and_admin_only(pool: PgPool) {
    let (_admin, admin_token) = admin_with_token(&pool).await;
    let (_agent, agent_token) = agent_with_token(&pool).await;
    let id = seed_target(&pool, &admin_token, 2026, 3, 500_000.0).await;

    let app = build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/activity/targets/{id}"),
        json!({ "target_amount": 600_000.0 }),
        &agent_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/activity/targets/{id}"),
        json!({ "target_amount": 600_000.0 }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["year"], 2026);
    assert_eq!(json["month"], 3);
    assert_eq!(json["target_amount"], 600_000.0);
}

/// Deleting a missing target is 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn delete_missing_target_returns_404(pool: PgPool) {
    let (_admin, admin_token) = admin_with_token(&pool).await;

    let app = build_test_app(pool);
    let response = delete_auth(app, "/api/activity/targets/999", &admin_token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Monthly target with id 999 not found");
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// The summary aggregates apartment counts, sales volume, and attainment
/// against the month's target.
#[sqlx::test(migrations = "../db/migrations")]
async fn summary_reflects_sales_and_target(pool: PgPool) {
    let (_admin, admin_token) = admin_with_token(&pool).await;
    let (_agent, agent_token) = agent_with_token(&pool).await;

    // Seed a project with one sold and one reserved apartment.
    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/projects",
        json!({ "name": "Les Palmiers" }),
        &agent_token,
    )
    .await;
    let project_id = body_json(response).await["id"].as_i64().unwrap();

    let mut apartment_ids = Vec::new();
    for number in ["A-01", "A-02"] {
        let app = build_test_app(pool.clone());
        let body = json!({
            "project_id": project_id,
            "number": number,
            "property_type": "APARTMENT",
            "area": 85.0,
            "price": 250_000.0
        });
        let response = post_json_auth(app, "/api/apartments", body, &agent_token).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        apartment_ids.push(body_json(response).await["id"].as_i64().unwrap());
    }

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/clients",
        json!({ "first_name": "Yasmine", "last_name": "Buyer", "email": "yasmine@client.test" }),
        &agent_token,
    )
    .await;
    let client_id = body_json(response).await["id"].as_i64().unwrap();

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/apartments/{}/assign", apartment_ids[0]),
        json!({ "client_id": client_id, "status": "SOLD" }),
        &agent_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/apartments/{}/assign", apartment_ids[1]),
        json!({ "client_id": client_id, "status": "RESERVED" }),
        &agent_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Target for the current UTC month; the sale above lands in it.
    let now = Utc::now();
    seed_target(&pool, &admin_token, now.year(), now.month() as i32, 1_000_000.0).await;

    // The summary is readable by a plain agent.
    let app = build_test_app(pool);
    let response = get_auth(app, "/api/activity/summary", &agent_token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["year"], now.year());
    assert_eq!(json["month"], now.month());
    assert_eq!(json["apartment_counts"]["available"], 0);
    assert_eq!(json["apartment_counts"]["reserved"], 1);
    assert_eq!(json["apartment_counts"]["sold"], 1);
    assert_eq!(json["apartment_counts"]["cancelled"], 0);
    assert_eq!(json["apartment_counts"]["total"], 2);
    assert_eq!(json["total_sales"], 250_000.0);
    assert_eq!(json["month_sales"], 250_000.0);
    assert_eq!(json["target_amount"], 1_000_000.0);
    assert_eq!(json["attainment_pct"], 25.0);
}

/// Without a target the attainment is null rather than zero.
#[sqlx::test(migrations = "../db/migrations")]
async fn summary_without_target_has_null_attainment(pool: PgPool) {
    let (_agent, token) = agent_with_token(&pool).await;

    let app = build_test_app(pool);
    let response = get_auth(app, "/api/activity/summary?year=2026&month=3", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["year"], 2026);
    assert_eq!(json["month"], 3);
    assert_eq!(json["apartment_counts"]["total"], 0);
    assert_eq!(json["total_sales"], 0.0);
    assert_eq!(json["month_sales"], 0.0);
    assert!(json["target_amount"].is_null());
    assert!(json["attainment_pct"].is_null());
}

/// Summary month bounds mirror the target validation.
#[sqlx::test(migrations = "../db/migrations")]
async fn summary_rejects_out_of_range_month(pool: PgPool) {
    let (_agent, token) = agent_with_token(&pool).await;

    let app = build_test_app(pool);
    let response = get_auth(app, "/api/activity/summary?year=2026&month=13", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}
