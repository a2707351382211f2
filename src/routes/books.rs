use axum::{
    extract::{Path, Query, State},
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
    types::{
        BookDetailsDto, BookDetailsResponse, BookDto, CreateBookRequest, ListBooksQuery,
        ListBooksResponse, ReviewPage, ReviewPageQuery, ReviewWithUserDto, SearchQuery,
        SearchResponse, UserPublic,
    },
};

const BOOK_COLUMNS: &str = "id, title, author, genre, published, created_by, created_at";
const LIKE_ESCAPE: char = '!';
const MAX_PAGE_LIMIT: i64 = 100;

fn book_from_row(row: &SqliteRow) -> AppResult<BookDto> {
    let id: String = row.try_get("id")?;
    let created_by: String = row.try_get("created_by")?;
    Ok(BookDto {
        id: super::parse_stored_id(&id)?,
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        genre: row.try_get("genre")?,
        published: row.try_get("published")?,
        created_by: super::parse_stored_id(&created_by)?,
        created_at: row.try_get("created_at")?,
    })
}

fn escape_like_pattern(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(ch);
    }
    out
}

/// POST /books (protected)
pub async fn add_book(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateBookRequest>,
) -> AppResult<impl IntoResponse> {
    let title = req.title.as_deref().map(str::trim).unwrap_or("");
    let author = req.author.as_deref().map(str::trim).unwrap_or("");
    let genre = req.genre.as_deref().map(str::trim).unwrap_or("");
    if title.is_empty() || author.is_empty() || genre.is_empty() {
        return Err(AppError::Validation("Title, author, and genre are required".to_string()));
    }

    let book_id = Uuid::new_v4();
    sqlx::query(
        r#"INSERT INTO books (id, title, author, genre, published, created_by)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
    )
    .bind(book_id.to_string())
    .bind(title)
    .bind(author)
    .bind(genre)
    .bind(&req.published)
    .bind(user.user_id.to_string())
    .execute(&state.db)
    .await?;

    // Read back the store-assigned timestamp for the response
    let created_at: String = sqlx::query_scalar("SELECT created_at FROM books WHERE id = ?1")
        .bind(book_id.to_string())
        .fetch_one(&state.db)
        .await?;

    let book = BookDto {
        id: book_id,
        title: title.to_string(),
        author: author.to_string(),
        genre: genre.to_string(),
        published: req.published,
        created_by: user.user_id,
        created_at,
    };

    state.metrics.inc_books_created();
    tracing::info!("Book added: {} ({})", book.title, book.id);

    Ok((StatusCode::CREATED, Json(json!({ "message": "Book added", "book": book }))))
}

/// GET /books
///
/// Optional exact-match author/genre filters. `total` is an independent COUNT
/// over the same filters, never capped by the page size.
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<ListBooksQuery>,
) -> AppResult<impl IntoResponse> {
    let page = super::page_param(query.page.as_deref(), 1);
    let limit = super::page_param(query.limit.as_deref(), 10).min(MAX_PAGE_LIMIT);
    // Saturating: an absurd page number yields an empty page, not an overflow
    let offset = page.saturating_sub(1).saturating_mul(limit);

    let mut count_qb = QueryBuilder::new("SELECT COUNT(*) AS cnt FROM books WHERE 1=1");
    if let Some(author) = &query.author {
        count_qb.push(" AND author = ").push_bind(author);
    }
    if let Some(genre) = &query.genre {
        count_qb.push(" AND genre = ").push_bind(genre);
    }
    let total: i64 = count_qb.build().fetch_one(&state.db).await?.try_get("cnt")?;

    let mut qb = QueryBuilder::new(format!("SELECT {} FROM books WHERE 1=1", BOOK_COLUMNS));
    if let Some(author) = &query.author {
        qb.push(" AND author = ").push_bind(author);
    }
    if let Some(genre) = &query.genre {
        qb.push(" AND genre = ").push_bind(genre);
    }
    // rowid breaks ties within the same second so "newest first" stays stable
    qb.push(" ORDER BY created_at DESC, rowid DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let rows = qb.build().fetch_all(&state.db).await?;
    let mut books = Vec::with_capacity(rows.len());
    for row in &rows {
        books.push(book_from_row(row)?);
    }

    Ok(Json(ListBooksResponse { page, limit, total, books }))
}

/// GET /books/{id}
///
/// Book with its creator, a page of its reviews (newest first) and the average
/// rating over ALL reviews, rounded to one decimal place.
pub async fn get_book_details(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(query): Query<ReviewPageQuery>,
) -> AppResult<impl IntoResponse> {
    let book_id = super::parse_id_param(&raw_id, "Book")?;
    let page = super::page_param(query.page.as_deref(), 1);
    let limit = super::page_param(query.limit.as_deref(), 5).min(MAX_PAGE_LIMIT);
    let offset = page.saturating_sub(1).saturating_mul(limit);

    let row = sqlx::query(
        r#"SELECT b.id, b.title, b.author, b.genre, b.published, b.created_at,
                  u.id AS creator_id, u.username AS creator_name
           FROM books b JOIN users u ON u.id = b.created_by
           WHERE b.id = ?1"#,
    )
    .bind(book_id.to_string())
    .fetch_optional(&state.db)
    .await?
    .ok_or_not_found("Book")?;

    let creator_id: String = row.try_get("creator_id")?;
    let book = BookDetailsDto {
        id: book_id,
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        genre: row.try_get("genre")?,
        published: row.try_get("published")?,
        created_by: UserPublic {
            id: super::parse_stored_id(&creator_id)?,
            username: row.try_get("creator_name")?,
        },
        created_at: row.try_get("created_at")?,
    };

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE book_id = ?1")
        .bind(book_id.to_string())
        .fetch_one(&state.db)
        .await?;

    // Average over the whole review set, independent of the requested page.
    let avg: Option<f64> = sqlx::query_scalar("SELECT AVG(rating) FROM reviews WHERE book_id = ?1")
        .bind(book_id.to_string())
        .fetch_one(&state.db)
        .await?;
    let average_rating = avg.map(|a| (a * 10.0).round() / 10.0).unwrap_or(0.0);

    let review_rows = sqlx::query(
        r#"SELECT r.id, r.rating, r.comment, r.created_at, r.updated_at,
                  u.id AS user_id, u.username
           FROM reviews r JOIN users u ON u.id = r.user_id
           WHERE r.book_id = ?1
           ORDER BY r.created_at DESC, r.rowid DESC
           LIMIT ?2 OFFSET ?3"#,
    )
    .bind(book_id.to_string())
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.db)
    .await?;

    let mut data = Vec::with_capacity(review_rows.len());
    for row in &review_rows {
        let review_id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        data.push(ReviewWithUserDto {
            id: super::parse_stored_id(&review_id)?,
            rating: row.try_get("rating")?,
            comment: row.try_get("comment")?,
            user: UserPublic {
                id: super::parse_stored_id(&user_id)?,
                username: row.try_get("username")?,
            },
            book: book_id,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        });
    }

    Ok(Json(BookDetailsResponse {
        book,
        average_rating,
        reviews: ReviewPage { page, limit, total, data },
    }))
}

/// GET /books/search?query=...
///
/// Case-insensitive substring match on title or author, newest first.
pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<impl IntoResponse> {
    let term = query.query.as_deref().map(str::trim).unwrap_or("");
    if term.is_empty() {
        return Err(AppError::Validation("Query parameter is required".to_string()));
    }
    if term.chars().count() > 200 {
        return Err(AppError::Validation("Search query too long".to_string()));
    }

    let pattern = format!("%{}%", escape_like_pattern(term));
    let rows = sqlx::query(&format!(
        r#"SELECT {} FROM books
           WHERE title LIKE ?1 ESCAPE '!' OR author LIKE ?1 ESCAPE '!'
           ORDER BY created_at DESC, rowid DESC"#,
        BOOK_COLUMNS
    ))
    .bind(&pattern)
    .fetch_all(&state.db)
    .await?;

    let mut results = Vec::with_capacity(rows.len());
    for row in &rows {
        results.push(book_from_row(row)?);
    }

    Ok(Json(SearchResponse { results }))
}
