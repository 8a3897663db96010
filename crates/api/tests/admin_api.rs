//! HTTP-level tests for the `/api/v1/admin` surface.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, delete, get, get_auth, post_json, put_json, seed_admin, seed_user,
    sign_token,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Authentication, no database needed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_authorization_header_returns_401() {
    let app = common::build_offline_app();
    let response = get(app, "/api/v1/admin/projects").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Missing Authorization header");
}

#[tokio::test]
async fn malformed_authorization_header_returns_401() {
    let app = common::build_offline_app();
    let request = axum::http::Request::builder()
        .uri("/api/v1/admin/projects")
        .header("authorization", "Token abc")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_token_returns_401() {
    let app = common::build_offline_app();
    let response = get_auth(app, "/api/v1/admin/team", "not.a.jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid or expired token");
}

#[tokio::test]
async fn missing_jwt_secret_returns_503() {
    let mut config = common::test_config();
    config.auth.jwt_secret = None;
    let app = common::build_app(config, None, None);

    let token = sign_token(Uuid::new_v4());
    let response = get_auth(app, "/api/v1/admin/projects", &token).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn valid_token_without_service_pool_returns_503() {
    let app = common::build_app(common::test_config(), None, None);
    let token = sign_token(Uuid::new_v4());
    let response = get_auth(app, "/api/v1/admin/stats", &token).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// ---------------------------------------------------------------------------
// Against Postgres
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_admin_is_forbidden(pool: PgPool) {
    let token = seed_user(&pool, "user").await;
    let app = build_test_app(pool);

    let response = get_auth(app, "/api/v1/admin/projects", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "Admin role required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn token_without_profile_is_forbidden(pool: PgPool) {
    let app = build_test_app(pool);
    let token = sign_token(Uuid::new_v4());

    let response = get_auth(app, "/api/v1/admin/me", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_returns_admin_profile(pool: PgPool) {
    let token = seed_admin(&pool).await;
    let app = build_test_app(pool);

    let json = body_json(get_auth(app, "/api/v1/admin/me", &token).await).await;
    assert_eq!(json["data"]["role"], "admin");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_partner_slug_returns_409(pool: PgPool) {
    let token = seed_admin(&pool).await;
    let app = build_test_app(pool);
    let body = json!({ "name": "Acme Engineering", "slug": "acme" });

    let response = post_json(app.clone(), "/api/v1/admin/partners", body.clone(), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["slug"], "acme");

    let response = post_json(app, "/api/v1/admin/partners", body, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["error"],
        "A partner with this slug already exists"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn slug_is_generated_from_title(pool: PgPool) {
    let token = seed_admin(&pool).await;
    let app = build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/admin/projects",
        json!({ "title": "Harbour Pavilion" }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["slug"], "harbour-pavilion");
    assert_eq!(json["data"]["status"], "completed");
    assert_eq!(json["data"]["is_published"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_with_missing_title_returns_400(pool: PgPool) {
    let token = seed_admin(&pool).await;
    let app = build_test_app(pool);

    let response = post_json(app, "/api/v1/admin/projects", json!({}), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Title is required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_is_partial_and_guards_slug(pool: PgPool) {
    let token = seed_admin(&pool).await;
    let app = build_test_app(pool);

    let first = body_json(
        post_json(
            app.clone(),
            "/api/v1/admin/services",
            json!({ "title": "Interiors", "slug": "interiors" }),
            Some(&token),
        )
        .await,
    )
    .await;
    let second = body_json(
        post_json(
            app.clone(),
            "/api/v1/admin/services",
            json!({ "title": "Landscape", "slug": "landscape" }),
            Some(&token),
        )
        .await,
    )
    .await;
    let id = second["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/admin/services/{id}");

    // Keeping its own slug is not a conflict.
    let response = put_json(app.clone(), &uri, json!({ "slug": "landscape", "is_published": true }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Landscape");
    assert_eq!(json["data"]["is_published"], true);

    let taken = first["data"]["slug"].as_str().unwrap();
    let response = put_json(app.clone(), &uri, json!({ "slug": taken }), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = put_json(app, &uri, json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No fields to update");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_of_missing_row_with_taken_slug_returns_404(pool: PgPool) {
    let token = seed_admin(&pool).await;
    let app = build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/admin/partners",
        json!({ "name": "Acme", "slug": "acme" }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = put_json(app, "/api/v1/admin/partners/987654", json!({ "slug": "acme" }), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Partner with id 987654 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_list_includes_unpublished(pool: PgPool) {
    let token = seed_admin(&pool).await;
    sqlx::query("INSERT INTO partners (name, slug, is_published) VALUES ('Draft', 'draft', FALSE)")
        .execute(&pool)
        .await
        .unwrap();
    let app = build_test_app(pool);

    let json = body_json(get_auth(app, "/api/v1/admin/partners", &token).await).await;
    assert_eq!(json["pagination"]["total"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_project_removes_partner_links(pool: PgPool) {
    let token = seed_admin(&pool).await;
    let app = build_test_app(pool.clone());

    let project = body_json(
        post_json(
            app.clone(),
            "/api/v1/admin/projects",
            json!({ "title": "Civic Hall" }),
            Some(&token),
        )
        .await,
    )
    .await;
    let partner = body_json(
        post_json(
            app.clone(),
            "/api/v1/admin/partners",
            json!({ "name": "Buro Light" }),
            Some(&token),
        )
        .await,
    )
    .await;
    let project_id = project["data"]["id"].as_i64().unwrap();
    let partner_id = partner["data"]["id"].as_i64().unwrap();

    let response = put_json(
        app.clone(),
        &format!("/api/v1/admin/projects/{project_id}/partners"),
        json!({ "partner_ids": [partner_id] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let response = delete(app.clone(), &format!("/api/v1/admin/projects/{project_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM project_partners")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(links, 0);

    let response = delete(app, &format!("/api/v1/admin/projects/{project_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_partner_id_keeps_existing_links(pool: PgPool) {
    let token = seed_admin(&pool).await;
    let app = build_test_app(pool);

    let project = body_json(
        post_json(app.clone(), "/api/v1/admin/projects", json!({ "title": "Atrium" }), Some(&token)).await,
    )
    .await;
    let id = project["data"]["id"].as_i64().unwrap();

    let response = put_json(
        app,
        &format!("/api/v1/admin/projects/{id}/partners"),
        json!({ "partner_ids": [987654] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Referenced record does not exist"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mutations_are_recorded_in_activity_log(pool: PgPool) {
    let token = seed_admin(&pool).await;
    let app = build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/admin/careers",
        json!({ "title": "Project Architect", "employment_type": "full_time" }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(
        get_auth(app, "/api/v1/admin/activity?entity_type=careers", &token).await,
    )
    .await;
    assert_eq!(json["pagination"]["total"], 1);
    assert_eq!(json["data"][0]["action"], "create");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn media_stats_group_by_mime_major_type(pool: PgPool) {
    let token = seed_admin(&pool).await;
    let app = build_test_app(pool);

    for (name, mime, size) in [
        ("a.jpg", "image/jpeg", 100),
        ("b.png", "image/png", 50),
        ("c.pdf", "application/pdf", 25),
    ] {
        let response = post_json(
            app.clone(),
            "/api/v1/admin/media",
            json!({
                "file_name": name,
                "url": format!("https://cdn.studio.example/{name}"),
                "mime_type": mime,
                "size_bytes": size,
            }),
            Some(&token),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let json = body_json(get_auth(app, "/api/v1/admin/media/stats", &token).await).await;
    assert_eq!(json["data"]["total_files"], 3);
    assert_eq!(json["data"]["total_bytes"], 175);
    assert_eq!(json["data"]["by_type"]["image"], 2);
    assert_eq!(json["data"]["by_type"]["application"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_counts_inbox(pool: PgPool) {
    let token = seed_admin(&pool).await;
    let app = build_test_app(pool);

    post_json(
        app.clone(),
        "/api/v1/public/contact",
        json!({ "name": "Ada", "email": "ada@example.com", "message": "Hi" }),
        None,
    )
    .await;

    let response = get_auth(app, "/api/v1/admin/stats", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["unread_contact_submissions"], 1);
}
