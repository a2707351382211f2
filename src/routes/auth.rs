use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::auth::issue_token,
    state::AppState,
    types::{LoginRequest, SignupRequest, TokenResponse},
};

/// POST /auth/signup
///
/// Registers a new user. The password is stored as a salted bcrypt hash with
/// the configured work factor; hashing runs on a blocking thread so it does
/// not stall the runtime.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    let username = req.username.as_deref().map(str::trim).unwrap_or("").to_string();
    let password = req.password.unwrap_or_default();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::Validation("Username and password are required".to_string()));
    }

    let existing = sqlx::query("SELECT id FROM users WHERE username = ?1")
        .bind(&username)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let cost = state.config.auth.bcrypt_cost;
    let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("hash task failed: {}", e)))??;

    let user_id = Uuid::new_v4();
    let insert = sqlx::query("INSERT INTO users (id, username, password_hash) VALUES (?1, ?2, ?3)")
        .bind(user_id.to_string())
        .bind(&username)
        .bind(&password_hash)
        .execute(&state.db)
        .await;
    if let Err(e) = insert {
        // A racing signup for the same username hits the UNIQUE constraint.
        return Err(match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict("Username already taken".to_string()),
            other => other,
        });
    }

    state.metrics.inc_signups();
    tracing::info!("New user registered: {}", username);

    Ok((StatusCode::CREATED, Json(json!({ "message": "User created", "userId": user_id }))))
}

/// POST /auth/login
///
/// The failure message never reveals whether the username or the password was
/// wrong.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let username = req.username.as_deref().map(str::trim).unwrap_or("").to_string();
    let password = req.password.unwrap_or_default();
    if username.is_empty() || password.is_empty() {
        state.metrics.inc_logins_failed();
        return Err(AppError::Auth("Invalid credentials".to_string()));
    }

    let row = sqlx::query("SELECT id, username, password_hash FROM users WHERE username = ?1")
        .bind(&username)
        .fetch_optional(&state.db)
        .await?;

    let row = match row {
        Some(row) => row,
        None => {
            state.metrics.inc_logins_failed();
            return Err(AppError::Auth("Invalid credentials".to_string()));
        }
    };

    let user_id: String = row.try_get("id")?;
    let stored_name: String = row.try_get("username")?;
    let password_hash: String = row.try_get("password_hash")?;

    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("verify task failed: {}", e)))??;
    if !matches {
        state.metrics.inc_logins_failed();
        return Err(AppError::Auth("Invalid credentials".to_string()));
    }

    let user_id = super::parse_stored_id(&user_id)?;
    let token = issue_token(&state.config.auth, user_id, &stored_name)?;

    state.metrics.inc_logins_succeeded();
    Ok(Json(TokenResponse { token }))
}
