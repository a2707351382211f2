//! # Buchregal Backend Library
//!
//! Buchregal is a small book-catalog and review service: users sign up and log
//! in, add books, browse and search the catalog, and leave one rating-and-comment
//! review per book. Every operation is a single request/response cycle backed by
//! one or two SQLite queries.
//!
//! ## Architecture
//!
//! The application is built using:
//! - **Axum**: HTTP server, routing and typed extractors
//! - **SQLx**: Asynchronous database operations with SQLite
//! - **Tokio**: Async runtime
//! - **Serde**: Serialization/deserialization for the JSON API
//! - **jsonwebtoken / bcrypt**: Bearer-token auth and password hashing
//!
//! ## Core Components
//!
//! - [`config`]: Layered application configuration
//! - [`db`]: Database schema initialization
//! - [`error`]: Centralized error taxonomy and HTTP error responses
//! - [`metrics`]: Domain counters exposed via /metrics
//! - [`middleware`]: Bearer-token verification and the `AuthUser` extractor
//! - [`routes`]: HTTP API endpoint handlers (auth, books, reviews, health)
//! - [`state`]: Shared application state
//! - [`types`]: Request/response DTOs and shared type definitions

pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
