//! Shared test scaffolding: an in-process router over a temp SQLite database
//! plus small request helpers used by the API test modules.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post, put},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::config::{AppConfig, AuthConfig, DatabaseConfig, ServerConfig};
use crate::routes;
use crate::state::AppState;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    // Keeps the database file alive for the duration of the test
    _data_dir: TempDir,
}

pub async fn setup_test_app() -> TestApp {
    let data_dir = TempDir::new().unwrap();
    let db_path = data_dir.path().join("test.db");
    let db_url = format!("sqlite:{}", db_path.display());

    sqlx::Sqlite::create_database(&db_url).await.unwrap();

    let pool = SqlitePoolOptions::new().max_connections(4).connect(&db_url).await.unwrap();

    crate::db::init_db(&pool).await.unwrap();

    let config = AppConfig {
        server: ServerConfig { host: "127.0.0.1".to_string(), port: 8080 },
        database: DatabaseConfig { url: db_url },
        auth: AuthConfig {
            jwt_secret: "test-secret-0123456789abcdef".to_string(),
            token_ttl_secs: 3600,
            // bcrypt minimum cost keeps the suite fast; production config
            // validation enforces >= 10
            bcrypt_cost: 4,
        },
    };

    let state = AppState::new(pool, config);
    let router = test_router(state.clone());

    TestApp { router, state, _data_dir: data_dir }
}

pub fn test_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(routes::health::healthz))
        .route("/readyz", get(routes::health::readyz))
        .route("/metrics", get(routes::health::metrics))
        .route("/metrics/prometheus", get(routes::health::metrics_prometheus))
        .route("/version", get(routes::health::version))
        .route("/auth/signup", post(routes::auth::signup))
        .route("/auth/login", post(routes::auth::login))
        .route("/books", get(routes::books::list_books).post(routes::books::add_book))
        .route("/books/search", get(routes::books::search_books))
        .route("/books/{id}", get(routes::books::get_book_details))
        .route("/books/{id}/reviews", post(routes::reviews::submit_review))
        .route(
            "/reviews/{id}",
            put(routes::reviews::update_review).delete(routes::reviews::delete_review),
        )
        .with_state(state)
}

/// Sends a request and returns status plus parsed JSON body (Null for
/// non-JSON bodies).
pub async fn send_json(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {}", t));
    }
    let request = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Registers a user and returns its id.
pub async fn signup_user(app: &TestApp, username: &str, password: &str) -> String {
    let (status, body) = send_json(
        &app.router,
        "POST",
        "/auth/signup",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
    body["userId"].as_str().unwrap().to_string()
}

/// Logs a user in and returns the bearer token.
pub async fn login_token(app: &TestApp, username: &str, password: &str) -> String {
    let (status, body) = send_json(
        &app.router,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

/// Creates a book and returns its JSON representation.
pub async fn create_book(app: &TestApp, token: &str, title: &str, author: &str, genre: &str) -> Value {
    let (status, body) = send_json(
        &app.router,
        "POST",
        "/books",
        Some(token),
        Some(json!({ "title": title, "author": author, "genre": genre })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "add_book failed: {}", body);
    body["book"].clone()
}

/// Submits a review, returning the raw (status, body) pair.
pub async fn submit_review(
    app: &TestApp,
    token: &str,
    book_id: &str,
    rating: Value,
    comment: Option<&str>,
) -> (StatusCode, Value) {
    let mut payload = json!({ "rating": rating });
    if let Some(c) = comment {
        payload["comment"] = json!(c);
    }
    send_json(&app.router, "POST", &format!("/books/{}/reviews", book_id), Some(token), Some(payload))
        .await
}
