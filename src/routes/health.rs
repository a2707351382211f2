use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

// Health check endpoint - lightweight
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Readiness probe: checks DB connectivity with timeout protection
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let query = sqlx::query("SELECT 1").fetch_one(&state.db);
    match tokio::time::timeout(std::time::Duration::from_secs(5), query).await {
        Ok(Ok(_)) => (StatusCode::OK, "ready").into_response(),
        Ok(Err(e)) => (StatusCode::SERVICE_UNAVAILABLE, format!("not ready: {}", e)).into_response(),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not ready: timeout").into_response(),
    }
}

// Metrics endpoint: returns JSON snapshot
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.metrics.get_snapshot();
    Json(snapshot)
}

// Prometheus-compatible text exposition format
pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let m = state.metrics.get_snapshot();
    let body = format!(
        "# HELP buchregal_signups Total signups\n# TYPE buchregal_signups counter\nbuchregal_signups {}\n\
# HELP buchregal_logins_succeeded Successful logins\n# TYPE buchregal_logins_succeeded counter\nbuchregal_logins_succeeded {}\n\
# HELP buchregal_logins_failed Failed logins\n# TYPE buchregal_logins_failed counter\nbuchregal_logins_failed {}\n\
# HELP buchregal_books_created Books created\n# TYPE buchregal_books_created counter\nbuchregal_books_created {}\n\
# HELP buchregal_reviews_created Reviews created\n# TYPE buchregal_reviews_created counter\nbuchregal_reviews_created {}\n\
# HELP buchregal_reviews_updated Reviews updated\n# TYPE buchregal_reviews_updated counter\nbuchregal_reviews_updated {}\n\
# HELP buchregal_reviews_deleted Reviews deleted\n# TYPE buchregal_reviews_deleted counter\nbuchregal_reviews_deleted {}\n\
# HELP buchregal_uptime_seconds Uptime seconds\n# TYPE buchregal_uptime_seconds gauge\nbuchregal_uptime_seconds {}\n",
        m.signups,
        m.logins_succeeded,
        m.logins_failed,
        m.books_created,
        m.reviews_created,
        m.reviews_updated,
        m.reviews_deleted,
        m.uptime_seconds,
    );
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

// Version/Build info endpoint (JSON)
pub async fn version() -> impl IntoResponse {
    let body = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "package": {
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "license": env!("CARGO_PKG_LICENSE"),
        },
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }
    });
    (StatusCode::OK, Json(body))
}
