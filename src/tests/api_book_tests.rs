#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use uuid::Uuid;

    use crate::tests::helpers::{
        create_book, login_token, send_json, setup_test_app, signup_user, submit_review,
    };

    #[tokio::test]
    async fn test_add_book_and_list_by_genre() {
        let app = setup_test_app().await;

        let user_id = signup_user(&app, "u1", "pw").await;
        let token = login_token(&app, "u1", "pw").await;

        let book = create_book(&app, &token, "Dune", "Herbert", "SciFi").await;
        assert_eq!(book["title"], "Dune");
        assert_eq!(book["createdBy"], json!(user_id));
        assert!(book["createdAt"].as_str().is_some());

        let (status, body) = send_json(&app.router, "GET", "/books?genre=SciFi", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["books"].as_array().unwrap().len(), 1);
        assert_eq!(body["books"][0]["title"], "Dune");

        // Filter that matches nothing
        let (status, body) = send_json(&app.router, "GET", "/books?genre=Romance", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
        assert!(body["books"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_book_missing_fields() {
        let app = setup_test_app().await;

        signup_user(&app, "u1", "pw").await;
        let token = login_token(&app, "u1", "pw").await;

        let (status, body) = send_json(
            &app.router,
            "POST",
            "/books",
            Some(&token),
            Some(json!({ "title": "Dune", "author": "Herbert" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Title, author, and genre are required");
    }

    #[tokio::test]
    async fn test_list_books_pagination() {
        let app = setup_test_app().await;

        signup_user(&app, "u1", "pw").await;
        let token = login_token(&app, "u1", "pw").await;
        for i in 0..12 {
            create_book(&app, &token, &format!("Book{}", i), "Author", "Genre").await;
        }

        // Defaults: page 1, limit 10; total not capped by the page size
        let (status, body) = send_json(&app.router, "GET", "/books", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"], 1);
        assert_eq!(body["limit"], 10);
        assert_eq!(body["total"], 12);
        assert_eq!(body["books"].as_array().unwrap().len(), 10);

        let (_, body) = send_json(&app.router, "GET", "/books?page=2", None, None).await;
        assert_eq!(body["page"], 2);
        assert_eq!(body["books"].as_array().unwrap().len(), 2);

        // Non-numeric and non-positive values fall back to the defaults
        let (status, body) =
            send_json(&app.router, "GET", "/books?page=abc&limit=xyz", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"], 1);
        assert_eq!(body["limit"], 10);

        let (_, body) = send_json(&app.router, "GET", "/books?page=0&limit=-3", None, None).await;
        assert_eq!(body["page"], 1);
        assert_eq!(body["limit"], 10);

        // A numeric prefix is not a number
        let (_, body) = send_json(&app.router, "GET", "/books?page=2abc", None, None).await;
        assert_eq!(body["page"], 1);
    }

    #[tokio::test]
    async fn test_pagination_survives_extreme_page_numbers() {
        let app = setup_test_app().await;

        signup_user(&app, "u1", "pw").await;
        let token = login_token(&app, "u1", "pw").await;
        let book = create_book(&app, &token, "Dune", "Herbert", "SciFi").await;
        let book_id = book["id"].as_str().unwrap();

        // i64::MAX as the page number is far past the data, not an error
        let uri = format!("/books?page={}", i64::MAX);
        let (status, body) = send_json(&app.router, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert!(body["books"].as_array().unwrap().is_empty());

        let uri = format!("/books?page={}&limit=100", i64::MAX);
        let (status, body) = send_json(&app.router, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["books"].as_array().unwrap().is_empty());

        // The review page of the details endpoint takes the same parameters
        let uri = format!("/books/{}?page={}", book_id, i64::MAX);
        let (status, body) = send_json(&app.router, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["reviews"]["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_books_newest_first() {
        let app = setup_test_app().await;

        signup_user(&app, "u1", "pw").await;
        let token = login_token(&app, "u1", "pw").await;
        create_book(&app, &token, "First", "A", "G").await;
        create_book(&app, &token, "Second", "A", "G").await;

        let (_, body) = send_json(&app.router, "GET", "/books", None, None).await;
        let books = body["books"].as_array().unwrap();
        assert_eq!(books[0]["title"], "Second");
        assert_eq!(books[1]["title"], "First");
    }

    #[tokio::test]
    async fn test_book_details_not_found() {
        let app = setup_test_app().await;

        let missing = Uuid::new_v4();
        let (status, body) =
            send_json(&app.router, "GET", &format!("/books/{}", missing), None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Book not found");

        // A malformed id cannot name any book
        let (status, _) = send_json(&app.router, "GET", "/books/not-a-uuid", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_book_details_average_rating() {
        let app = setup_test_app().await;

        signup_user(&app, "creator", "pw").await;
        let creator_token = login_token(&app, "creator", "pw").await;
        let book = create_book(&app, &creator_token, "Dune", "Herbert", "SciFi").await;
        let book_id = book["id"].as_str().unwrap().to_string();

        for (name, rating) in [("r1", 4), ("r2", 5)] {
            signup_user(&app, name, "pw").await;
            let token = login_token(&app, name, "pw").await;
            let (status, _) = submit_review(&app, &token, &book_id, json!(rating), Some("ok")).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) =
            send_json(&app.router, "GET", &format!("/books/{}", book_id), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["averageRating"], 4.5);
        assert_eq!(body["reviews"]["total"], 2);
        assert_eq!(body["reviews"]["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["book"]["createdBy"]["username"], "creator");
        // Newest review first, with its author joined in
        assert_eq!(body["reviews"]["data"][0]["user"]["username"], "r2");
    }

    #[tokio::test]
    async fn test_book_details_without_reviews() {
        let app = setup_test_app().await;

        signup_user(&app, "u1", "pw").await;
        let token = login_token(&app, "u1", "pw").await;
        let book = create_book(&app, &token, "Dune", "Herbert", "SciFi").await;
        let book_id = book["id"].as_str().unwrap();

        let (_, body) = send_json(&app.router, "GET", &format!("/books/{}", book_id), None, None).await;
        assert_eq!(body["averageRating"], 0.0);
        assert_eq!(body["reviews"]["total"], 0);
        assert!(body["reviews"]["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_average_rating_covers_all_reviews_not_just_page() {
        let app = setup_test_app().await;

        signup_user(&app, "creator", "pw").await;
        let creator_token = login_token(&app, "creator", "pw").await;
        let book = create_book(&app, &creator_token, "Dune", "Herbert", "SciFi").await;
        let book_id = book["id"].as_str().unwrap().to_string();

        // 7 reviews: five 5s and two 1s -> 27/7 = 3.857... -> 3.9
        let ratings = [5, 5, 5, 5, 5, 1, 1];
        for (i, rating) in ratings.iter().enumerate() {
            let name = format!("rev{}", i);
            signup_user(&app, &name, "pw").await;
            let token = login_token(&app, &name, "pw").await;
            let (status, _) = submit_review(&app, &token, &book_id, json!(rating), None).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        // Default review page size is 5, but the average covers all 7
        let (_, body) = send_json(&app.router, "GET", &format!("/books/{}", book_id), None, None).await;
        assert_eq!(body["reviews"]["limit"], 5);
        assert_eq!(body["reviews"]["data"].as_array().unwrap().len(), 5);
        assert_eq!(body["reviews"]["total"], 7);
        assert_eq!(body["averageRating"], 3.9);

        // Page 2 reports the same whole-set average
        let (_, body) =
            send_json(&app.router, "GET", &format!("/books/{}?page=2", book_id), None, None).await;
        assert_eq!(body["reviews"]["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["averageRating"], 3.9);
    }

    #[tokio::test]
    async fn test_search_case_insensitive_substring() {
        let app = setup_test_app().await;

        signup_user(&app, "u1", "pw").await;
        let token = login_token(&app, "u1", "pw").await;
        create_book(&app, &token, "Dune", "Herbert", "SciFi").await;
        create_book(&app, &token, "Emma", "Austen", "Classic").await;

        let (status, body) =
            send_json(&app.router, "GET", "/books/search?query=herb", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["author"], "Herbert");

        // Title matches too
        let (_, body) = send_json(&app.router, "GET", "/books/search?query=DUNE", None, None).await;
        assert_eq!(body["results"].as_array().unwrap().len(), 1);

        // No match
        let (_, body) = send_json(&app.router, "GET", "/books/search?query=tolkien", None, None).await;
        assert!(body["results"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let app = setup_test_app().await;

        let (status, body) = send_json(&app.router, "GET", "/books/search", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Query parameter is required");

        let (status, _) = send_json(&app.router, "GET", "/books/search?query=", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_escapes_like_wildcards() {
        let app = setup_test_app().await;

        signup_user(&app, "u1", "pw").await;
        let token = login_token(&app, "u1", "pw").await;
        create_book(&app, &token, "100% Wool", "Knitter", "Craft").await;
        create_book(&app, &token, "Dune", "Herbert", "SciFi").await;

        // A literal '%' must not act as a wildcard
        let (status, body) =
            send_json(&app.router, "GET", "/books/search?query=100%25", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["title"], "100% Wool");
    }
}
