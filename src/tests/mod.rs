//! Integration and unit tests for the Buchregal application.
//!
//! ## Test Modules
//!
//! - **api_auth_tests**: Signup/login endpoints and bearer-token enforcement
//! - **api_book_tests**: Catalog creation, listing, details/averages, search
//! - **api_review_tests**: Review submission, ownership rules, idempotence
//! - **auth_token_tests**: Token signing and verification
//! - **config_tests**: Configuration defaults and validation
//! - **db_tests**: Schema bootstrap and store-level constraints
//! - **error_tests**: Error taxonomy and HTTP mapping
//! - **health_api_tests**: Health/metrics/version endpoints
//!
//! Run with `cargo test`, or a single module with e.g.
//! `cargo test api_review_tests`.

pub mod helpers;

pub mod api_book_tests;
