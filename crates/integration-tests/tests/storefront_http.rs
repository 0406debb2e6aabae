//! Cart routes driven through the storefront router.
//!
//! Sessions live in memory and the database pool connects lazily, so only
//! requests that never touch the catalog run here. Catalog-backed requests
//! are in the ignored tests at the bottom.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use cartwheel_storefront::config::StorefrontConfig;
use cartwheel_storefront::routes;
use cartwheel_storefront::state::AppState;

fn test_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/cartwheel_test".to_string())
}

fn test_config(database_url: &str) -> StorefrontConfig {
    let database_url = database_url.to_string();
    StorefrontConfig::from_source(|key| match key {
        "STOREFRONT_DATABASE_URL" => Some(database_url.clone()),
        "STOREFRONT_BASE_URL" => Some("http://localhost:3000".to_string()),
        _ => None,
    })
    .unwrap()
}

fn app_with_pool(pool: sqlx::PgPool) -> Router {
    let config = test_config(&test_database_url());
    let session_layer = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);

    routes::routes()
        .layer(session_layer)
        .with_state(AppState::new(config, pool))
}

fn app() -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy(&test_database_url())
        .unwrap();
    app_with_pool(pool)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, cookie, body.to_vec())
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn json_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, _, body) = send(&app(), get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn test_new_visitor_sees_empty_cart() {
    let (status, _, body) = send(&app(), get("/cart", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_body(&body),
        json!({ "items": [], "count": 0, "total": "$0.00", "currency": "USD" })
    );
}

#[tokio::test]
async fn test_count_of_empty_cart() {
    let (status, _, body) = send(&app(), get("/cart/count", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!({ "count": 0 }));
}

#[tokio::test]
async fn test_type_of_empty_cart_conflicts() {
    let (status, _, _) = send(&app(), get("/cart/type", None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_zero_quantity_is_bad_request() {
    let app = app();
    let body = json!({ "kind": "product", "id": 1, "quantity": 0 });

    let (status, _, _) = send(&app, post_json("/cart/add", &body, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(&app, post_json("/cart/set", &body, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_kind_is_rejected() {
    let body = json!({ "kind": "bundle", "id": 1 });
    let (status, _, _) = send(&app(), post_json("/cart/add", &body, None)).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_remove_missing_row_and_clear_succeed() {
    let app = app();

    let body = json!({ "kind": "service", "id": 9 });
    let (status, cookie, body) = send(&app, post_json("/cart/remove", &body, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["count"], 0);

    // The write-through created a session
    let cookie = cookie.unwrap();

    let clear = Request::post("/cart/clear")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(&app, clear).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["items"], json!([]));
}

// ============================================================================
// Database-backed tests
// ============================================================================

async fn seeded_app() -> (Router, i32, i32) {
    use cartwheel_core::BuyableKind;
    use cartwheel_storefront::db::CatalogRepository;
    use rust_decimal::Decimal;

    let pool = PgPoolOptions::new()
        .connect(&test_database_url())
        .await
        .expect("Failed to connect to test database");

    let repo = CatalogRepository::new(&pool);
    let mug = repo
        .create(BuyableKind::Product, "Test Mug", Decimal::new(1200, 2))
        .await
        .unwrap();
    let wrap = repo
        .create(BuyableKind::Service, "Test Wrap", Decimal::new(300, 2))
        .await
        .unwrap();

    (app_with_pool(pool), mug.id.as_i32(), wrap.id.as_i32())
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database at DATABASE_URL"]
async fn test_cart_flow_against_database() {
    let (app, mug, wrap) = seeded_app().await;

    let (status, cookie, _) = send(
        &app,
        post_json("/cart/add", &json!({ "kind": "product", "id": mug, "quantity": 2 }), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let cookie = cookie.unwrap();

    send(
        &app,
        post_json("/cart/add", &json!({ "kind": "service", "id": wrap }), Some(&cookie)),
    )
    .await;
    let (_, _, body) = send(
        &app,
        post_json("/cart/add", &json!({ "kind": "product", "id": mug, "quantity": 3 }), Some(&cookie)),
    )
    .await;

    let cart = json_body(&body);
    assert_eq!(cart["count"], 6);
    assert_eq!(cart["total"], "$63.00");
    assert_eq!(cart["items"][0]["row_id"], format!("product-{mug}"));
    assert_eq!(cart["items"][0]["quantity"], 5);

    let (_, _, body) = send(&app, get("/cart/type", Some(&cookie))).await;
    assert_eq!(json_body(&body), json!({ "type": "PRODUCT" }));

    let (status, _, _) = send(
        &app,
        post_json("/cart/add", &json!({ "kind": "subscription", "id": 0 }), Some(&cookie)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
