//! Middleware components for HTTP request processing.
//!
//! Currently this is bearer-token authentication: issuing and verifying the
//! signed tokens handed out by `/auth/login`, and the [`auth::AuthUser`]
//! extractor that protected handlers take as an argument.

pub mod auth;

pub use auth::AuthUser;
