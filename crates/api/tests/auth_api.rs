//! End-to-end tests for `/api/auth` against a real database.

mod common;

use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_admin, get_auth, get_with_cookie, post_json,
    post_json_auth, TEST_PASSWORD,
};
use sqlx::PgPool;
use vitrine_api::auth::jwt::verify_token;
use vitrine_db::repositories::AdminRepo;

#[sqlx::test(migrations = "../db/migrations")]
async fn register_then_conflict(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let body = serde_json::json!({
        "username": "admin",
        "email": "admin@example.com",
        "password": "secret123",
    });

    let response = post_json(app.app(), "/api/auth/register", body.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "admin");
    assert!(json["data"].get("password_hash").is_none());

    let stored = AdminRepo::find_by_username(&pool, "admin").await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "secret123");

    let response = post_json(app.app(), "/api/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_sets_cookie_resolving_to_same_admin(pool: PgPool) {
    let admin = create_admin(&pool, "admin").await;
    let app = build_test_app(pool);

    let body = serde_json::json!({ "username": "admin", "password": TEST_PASSWORD });
    let response = post_json(app.app(), "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("token="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));

    let json = body_json(response).await;
    let token = json["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(json["data"]["id"], admin.id);
    assert_eq!(verify_token(&token, &app.config.jwt).unwrap().sub, admin.id);

    let cookie_pair = set_cookie.split(';').next().unwrap();
    let response = get_with_cookie(app.app(), "/api/auth/me", cookie_pair).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["email"], "admin@example.com");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn wrong_password_and_unknown_user_look_alike(pool: PgPool) {
    create_admin(&pool, "admin").await;
    let app = build_test_app(pool);

    let wrong = post_json(
        app.app(),
        "/api/auth/login",
        serde_json::json!({ "username": "admin", "password": "not-the-password" }),
    )
    .await;
    let unknown = post_json(
        app.app(),
        "/api/auth/login",
        serde_json::json!({ "username": "ghost", "password": TEST_PASSWORD }),
    )
    .await;

    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(wrong).await, body_json(unknown).await);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_clears_cookie(pool: PgPool) {
    let admin = create_admin(&pool, "admin").await;
    let app = build_test_app(pool);
    let token = app.token_for(admin.id);

    let response =
        post_json_auth(app.app(), "/api/auth/logout", serde_json::json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.starts_with("token=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn token_of_deleted_admin_is_rejected(pool: PgPool) {
    let admin = create_admin(&pool, "admin").await;
    let app = build_test_app(pool.clone());
    let token = app.token_for(admin.id);

    sqlx::query("DELETE FROM admins WHERE id = $1")
        .bind(admin.id)
        .execute(&pool)
        .await
        .unwrap();

    let response = get_auth(app.app(), "/api/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Admin not found");
}
