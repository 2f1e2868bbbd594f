//! HTTP-level integration tests for registration, login, user listing and
//! bearer token handling.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, get, get_auth, post_json, register};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

fn registration(username: &str, password: &str) -> serde_json::Value {
    json!({
        "username": username,
        "firstName": "Matti",
        "lastName": "Luukkainen",
        "password": password,
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_returns_token_and_name(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/users", registration("mluukkai", "salainen1")).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["token"].is_string());
    assert_eq!(json["username"], "mluukkai");
    assert_eq!(json["name"], "Matti Luukkainen");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_missing_or_short_password(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/users",
        json!({ "username": "nopass", "firstName": "A", "lastName": "B" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "password is required");

    let response = post_json(app, "/api/users", registration("shorty", "seven77")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "password must have a minimum length of 8"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_blank_username(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/users", registration("   ", "long-enough")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "username is required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_duplicate_username(pool: PgPool) {
    let app = common::build_test_app(pool);
    register(app.clone(), "twice").await;

    let response = post_json(app, "/api/users", registration("twice", "another-pass")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_succeeds_with_correct_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    register(app.clone(), "loginuser").await;

    let response = post_json(
        app.clone(),
        "/api/login",
        json!({ "username": "loginuser", "password": "sekret-password" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["username"], "loginuser");
    assert_eq!(json["name"], "Test User");

    let token = json["token"].as_str().unwrap();
    let response = get_auth(app, "/api/lists", token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_rejects_wrong_password_and_unknown_user(pool: PgPool) {
    let app = common::build_test_app(pool);
    register(app.clone(), "wrongpw").await;

    let response = post_json(
        app.clone(),
        "/api/login",
        json!({ "username": "wrongpw", "password": "incorrect" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        app,
        "/api/login",
        json!({ "username": "ghost", "password": "whatever1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_token_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/cards").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "token missing");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn garbage_token_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/cards", "not.a.token").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "token invalid");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn capitalised_bearer_scheme_is_accepted(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register(app.clone(), "capital").await;

    let request = Request::builder()
        .uri("/api/lists")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn users_listing_shows_owned_lists_without_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register(app.clone(), "lister").await;
    let list_id = common::create_list(app.clone(), "To dos", &token).await;

    let response = get_auth(app, "/api/users", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let users = json.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "lister");
    assert_eq!(users[0]["lists"], json!([list_id]));
    assert!(users[0].get("passwordHash").is_none());
    assert!(users[0].get("password_hash").is_none());
}
