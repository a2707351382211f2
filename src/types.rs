use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Wire DTOs. Field names are camelCase because they are the contract of the
// API this service replaces - existing clients read `createdBy`, `createdAt`,
// `averageRating` etc.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub genre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    pub created_by: Uuid,
    pub created_at: String,
}

/// Book with the creator joined in, as returned by the details endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDetailsDto {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub genre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    pub created_by: UserPublic,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    pub id: Uuid,
    pub rating: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub user: Uuid,
    pub book: Uuid,
    pub created_at: String,
    pub updated_at: String,
}

/// Review with its author joined in, for the details endpoint's review list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithUserDto {
    pub id: Uuid,
    pub rating: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub user: UserPublic,
    pub book: Uuid,
    pub created_at: String,
    pub updated_at: String,
}

// Request bodies. Everything is Option so that missing fields reach the
// handlers and come back as a 400 with the documented message instead of a
// deserializer rejection.

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub published: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReviewRequest {
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateReviewRequest {
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

// Query parameters. page/limit arrive as raw strings so that non-numeric
// values fall back to the defaults, as the old API did, instead of rejecting
// the request.

#[derive(Debug, Deserialize)]
pub struct ListBooksQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewPageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

// Response envelopes.

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListBooksResponse {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub books: Vec<BookDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewPage {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub data: Vec<ReviewWithUserDto>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDetailsResponse {
    pub book: BookDetailsDto,
    pub average_rating: f64,
    pub reviews: ReviewPage,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub results: Vec<BookDto>,
}
