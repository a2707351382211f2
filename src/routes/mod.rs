//! HTTP route handlers for the Buchregal API.
//!
//! Each sub-module handles one domain:
//!
//! - `auth`: signup and login
//! - `books`: catalog creation, listing, details with ratings, search
//! - `health`: health check, readiness, metrics and version endpoints
//! - `reviews`: submitting, editing and deleting reviews

pub mod auth;
pub mod books;
pub mod health;
pub mod reviews;

use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Parses a path id. A malformed id cannot name any resource, so it is
/// reported the same way as an unknown one.
pub(crate) fn parse_id_param(raw: &str, entity: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("{} not found", entity)))
}

/// Parses an id column read back from the store.
pub(crate) fn parse_stored_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| AppError::Database(format!("corrupt id in store: {}", e)))
}

/// Lenient pagination parsing: absent, non-numeric, zero and negative values
/// all fall back to the default, as the old API did.
pub(crate) fn page_param(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).filter(|v| *v >= 1).unwrap_or(default)
}
