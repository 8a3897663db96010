//! HTTP-level tests for the `/api/v1/public` surface.
//!
//! The first group runs without a database: pools point at a closed port or
//! are absent. The second group runs against Postgres via `#[sqlx::test]`.

mod common;

use archsite_api::config::ErrorPolicy;
use axum::http::StatusCode;
use common::{body_json, build_test_app, get, post_json};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Without a database
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_degrades_to_empty_page_when_database_unreachable() {
    let app = common::build_offline_app();
    let response = get(app, "/api/v1/public/projects?page=2&limit=20").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json,
        json!({
            "data": [],
            "pagination": { "page": 2, "limit": 20, "total": 0, "totalPages": 0 }
        })
    );
}

#[tokio::test]
async fn degraded_list_uses_collection_default_limit() {
    let app = common::build_offline_app();
    let json = body_json(get(app, "/api/v1/public/projects").await).await;

    assert_eq!(json["pagination"]["page"], 1);
    assert_eq!(json["pagination"]["limit"], 12);
}

#[tokio::test]
async fn list_surfaces_failure_under_surface_policy() {
    let mut config = common::test_config();
    config.public_list_policy = ErrorPolicy::Surface;
    let app = common::build_app(
        config,
        Some(common::unreachable_pool()),
        Some(common::unreachable_pool()),
    );

    let response = get(app, "/api/v1/public/team").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn missing_public_pool_returns_503() {
    let app = common::build_app(common::test_config(), None, None);
    let response = get(app, "/api/v1/public/services").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn contact_requires_name() {
    let app = common::build_offline_app();
    let response = post_json(
        app,
        "/api/v1/public/contact",
        json!({ "email": "client@example.com", "message": "Hello" }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Name is required");
}

#[tokio::test]
async fn contact_rejects_invalid_email() {
    let app = common::build_offline_app();
    let response = post_json(
        app,
        "/api/v1/public/contact",
        json!({ "name": "Ada", "email": "not-an-email", "message": "Hello" }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn newsletter_rejects_invalid_email() {
    let app = common::build_app(common::test_config(), None, None);
    let response = post_json(
        app,
        "/api/v1/public/newsletter",
        json!({ "email": "nope" }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn newsletter_requires_email() {
    let app = common::build_app(common::test_config(), None, None);
    let response = post_json(app, "/api/v1/public/newsletter", json!({}), None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Email is required");
}

// ---------------------------------------------------------------------------
// Against Postgres
// ---------------------------------------------------------------------------

async fn seed_projects(pool: &PgPool, count: i32, published: bool, prefix: &str) {
    sqlx::query(
        "INSERT INTO projects (title, slug, is_published, sort_order) \
         SELECT $1 || ' ' || g, $1 || '-' || g, $2, g FROM generate_series(1, $3) AS g",
    )
    .bind(prefix)
    .bind(published)
    .bind(count)
    .execute(pool)
    .await
    .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_page_of_published_projects(pool: PgPool) {
    seed_projects(&pool, 45, true, "project").await;
    let app = build_test_app(pool);

    let json = body_json(get(app, "/api/v1/public/projects?page=2&limit=20").await).await;

    assert_eq!(json["data"].as_array().unwrap().len(), 20);
    assert_eq!(
        json["pagination"],
        json!({ "page": 2, "limit": 20, "total": 45, "totalPages": 3 })
    );
    // sort_order ascending: the second page starts at the 21st project.
    assert_eq!(json["data"][0]["slug"], "project-21");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn public_list_hides_unpublished(pool: PgPool) {
    seed_projects(&pool, 3, true, "live").await;
    seed_projects(&pool, 2, false, "draft").await;
    let app = build_test_app(pool);

    let json = body_json(get(app.clone(), "/api/v1/public/projects").await).await;
    assert_eq!(json["pagination"]["total"], 3);

    let response = get(app, "/api/v1/public/projects/draft-1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Project 'draft-1' not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_matches_title(pool: PgPool) {
    seed_projects(&pool, 2, true, "harbour").await;
    seed_projects(&pool, 2, true, "museum").await;
    let app = build_test_app(pool);

    let json = body_json(get(app, "/api/v1/public/projects?search=HARB").await).await;
    assert_eq!(json["pagination"]["total"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn project_detail_lists_only_published_partners(pool: PgPool) {
    seed_projects(&pool, 1, true, "pavilion").await;
    sqlx::query(
        "INSERT INTO partners (name, slug, is_published) VALUES \
         ('Arup', 'arup', TRUE), ('Hidden', 'hidden', FALSE)",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO project_partners (project_id, partner_id) \
         SELECT p.id, pa.id FROM projects p CROSS JOIN partners pa",
    )
    .execute(&pool)
    .await
    .unwrap();
    let app = build_test_app(pool);

    let response = get(app, "/api/v1/public/projects/pavilion-1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["slug"], "pavilion-1");
    assert!(json["data"]["category"].is_null());
    let partners = json["data"]["partners"].as_array().unwrap();
    assert_eq!(partners.len(), 1);
    assert_eq!(partners[0]["slug"], "arup");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn contact_submission_is_stored_as_new(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/public/contact",
        json!({ "name": "Ada", "email": "ada@example.com", "message": "A new library?" }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "new");
    assert_eq!(json["data"]["email"], "ada@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn newsletter_subscribe_lifecycle(pool: PgPool) {
    let app = build_test_app(pool);
    let subscribe = json!({ "email": "Reader@Example.com", "name": "Reader" });

    let response = post_json(app.clone(), "/api/v1/public/newsletter", subscribe.clone(), None).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["email"], "reader@example.com");

    let response = post_json(app.clone(), "/api/v1/public/newsletter", subscribe.clone(), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "This email is already subscribed");

    let response = post_json(
        app.clone(),
        "/api/v1/public/newsletter/unsubscribe",
        json!({ "email": "reader@example.com" }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "unsubscribed");

    let response = post_json(app, "/api/v1/public/newsletter", subscribe, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "subscribed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unsubscribing_unknown_email_returns_404(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/public/newsletter/unsubscribe",
        json!({ "email": "ghost@example.com" }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
