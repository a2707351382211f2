use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, OptionExt},
    middleware::auth::AuthUser,
    state::AppState,
    types::{CreateReviewRequest, ReviewDto, UpdateReviewRequest},
};

fn review_from_row(row: &SqliteRow) -> AppResult<ReviewDto> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let book_id: String = row.try_get("book_id")?;
    Ok(ReviewDto {
        id: super::parse_stored_id(&id)?,
        rating: row.try_get("rating")?,
        comment: row.try_get("comment")?,
        user: super::parse_stored_id(&user_id)?,
        book: super::parse_stored_id(&book_id)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

async fn fetch_review(db: &sqlx::SqlitePool, review_id: Uuid) -> AppResult<Option<SqliteRow>> {
    let row = sqlx::query(
        "SELECT id, book_id, user_id, rating, comment, created_at, updated_at FROM reviews WHERE id = ?1",
    )
    .bind(review_id.to_string())
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// POST /books/{id}/reviews (protected)
///
/// One review per user per book. The friendly pre-check handles the common
/// case; the UNIQUE(user_id, book_id) index closes the race between two
/// concurrent submissions.
pub async fn submit_review(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    user: AuthUser,
    Json(req): Json<CreateReviewRequest>,
) -> AppResult<impl IntoResponse> {
    let rating = match req.rating {
        Some(r) if (1..=5).contains(&r) => r,
        _ => {
            return Err(AppError::Validation(
                "Rating is required and must be between 1 and 5".to_string(),
            ))
        }
    };

    let book_id = super::parse_id_param(&raw_id, "Book")?;
    sqlx::query("SELECT id FROM books WHERE id = ?1")
        .bind(book_id.to_string())
        .fetch_optional(&state.db)
        .await?
        .ok_or_not_found("Book")?;

    let existing = sqlx::query("SELECT id FROM reviews WHERE user_id = ?1 AND book_id = ?2")
        .bind(user.user_id.to_string())
        .bind(book_id.to_string())
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("You have already reviewed this book".to_string()));
    }

    let review_id = Uuid::new_v4();
    let insert = sqlx::query(
        "INSERT INTO reviews (id, book_id, user_id, rating, comment) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(review_id.to_string())
    .bind(book_id.to_string())
    .bind(user.user_id.to_string())
    .bind(rating)
    .bind(&req.comment)
    .execute(&state.db)
    .await;
    if let Err(e) = insert {
        return Err(match AppError::from(e) {
            AppError::Conflict(_) => {
                AppError::Conflict("You have already reviewed this book".to_string())
            }
            other => other,
        });
    }

    let row = fetch_review(&state.db, review_id).await?.ok_or_not_found("Review")?;
    let review = review_from_row(&row)?;

    state.metrics.inc_reviews_created();
    Ok((StatusCode::CREATED, Json(json!({ "message": "Review submitted", "review": review }))))
}

/// PUT /reviews/{id} (protected)
///
/// Partial update: only supplied fields change. Owner only.
pub async fn update_review(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    user: AuthUser,
    Json(req): Json<UpdateReviewRequest>,
) -> AppResult<impl IntoResponse> {
    if let Some(r) = req.rating {
        if !(1..=5).contains(&r) {
            return Err(AppError::Validation("Rating must be between 1 and 5".to_string()));
        }
    }

    let review_id = super::parse_id_param(&raw_id, "Review")?;
    let row = fetch_review(&state.db, review_id).await?.ok_or_not_found("Review")?;

    let owner_id: String = row.try_get("user_id")?;
    if super::parse_stored_id(&owner_id)? != user.user_id {
        return Err(AppError::Forbidden("Not authorized to edit this review".to_string()));
    }

    if req.rating.is_none() && req.comment.is_none() {
        // Nothing to change; answer with the current state.
        let review = review_from_row(&row)?;
        return Ok(Json(json!({ "message": "Review updated", "review": review })));
    }

    let mut qb =
        QueryBuilder::new("UPDATE reviews SET updated_at = strftime('%Y-%m-%dT%H:%M:%SZ','now')");
    if let Some(rating) = req.rating {
        qb.push(", rating = ").push_bind(rating);
    }
    if let Some(comment) = &req.comment {
        qb.push(", comment = ").push_bind(comment);
    }
    qb.push(" WHERE id = ").push_bind(review_id.to_string());
    qb.build().execute(&state.db).await?;

    let row = fetch_review(&state.db, review_id).await?.ok_or_not_found("Review")?;
    let review = review_from_row(&row)?;

    state.metrics.inc_reviews_updated();
    Ok(Json(json!({ "message": "Review updated", "review": review })))
}

/// DELETE /reviews/{id} (protected)
///
/// Owner only. Deletion is terminal - a second delete reports 404.
pub async fn delete_review(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let review_id = super::parse_id_param(&raw_id, "Review")?;
    let row = fetch_review(&state.db, review_id).await?.ok_or_not_found("Review")?;

    let owner_id: String = row.try_get("user_id")?;
    if super::parse_stored_id(&owner_id)? != user.user_id {
        return Err(AppError::Forbidden("Not authorized to delete this review".to_string()));
    }

    sqlx::query("DELETE FROM reviews WHERE id = ?1")
        .bind(review_id.to_string())
        .execute(&state.db)
        .await?;

    state.metrics.inc_reviews_deleted();
    Ok(Json(json!({ "message": "Review deleted" })))
}
