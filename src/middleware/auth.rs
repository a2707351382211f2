use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Token payload.
///
/// `userId`/`username` are part of the wire contract - clients of the old API
/// decode them out of the token body, so the names must not change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub username: String,
    pub iat: usize,
    pub exp: usize,
}

/// Signs a token for the given user, valid for `auth.token_ttl_secs`.
pub fn issue_token(cfg: &AuthConfig, user_id: Uuid, username: &str) -> AppResult<String> {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        user_id,
        username: username.to_string(),
        iat: now,
        exp: now + cfg.token_ttl_secs as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to sign token: {}", e)))
}

/// Verifies signature and expiry. Callers never learn which check failed.
pub fn decode_token(cfg: &AuthConfig, token: &str) -> AppResult<Claims> {
    decode::<Claims>(token, &DecodingKey::from_secret(cfg.jwt_secret.as_bytes()), &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| AppError::Auth("Invalid or expired token".to_string()))
}

/// The authenticated caller, extracted from `Authorization: Bearer <token>`.
///
/// Handlers for protected routes simply take this as an argument; requests
/// without a valid token are rejected with 401 before the handler body runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts.headers.get(header::AUTHORIZATION).and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(value) if value.starts_with("Bearer ") => &value[7..],
            _ => return Err(AppError::Auth("Missing or malformed authorization header".to_string())),
        };

        let claims = decode_token(&state.config.auth, token)?;
        Ok(AuthUser { user_id: claims.user_id, username: claims.username })
    }
}
