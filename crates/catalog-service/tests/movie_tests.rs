//! Movie endpoint integration tests over the checked-in fixture catalog.
//!
//! Auth stays enabled with a minted token so the routes are exercised the
//! way clients see them.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use axum::http::StatusCode;
use common::{body_json, body_text, get, mint_token, test_app, test_config, FAR_FUTURE};

fn auth_header() -> (String, String) {
    (
        "authorization".to_string(),
        format!("Bearer {}", mint_token("tester", FAR_FUTURE)),
    )
}

async fn authed_get(uri: &str) -> axum::http::Response<axum::body::Body> {
    let (name, value) = auth_header();
    get(test_app(test_config(&[])), uri, &[(name.as_str(), value.as_str())]).await
}

#[tokio::test]
async fn test_list_movies_returns_catalog() {
    let response = authed_get("/api/v1/movies").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let movies = body.as_array().unwrap();
    assert_eq!(movies.len(), 6);
    assert_eq!(movies.first().unwrap()["id"], "m1");
}

#[tokio::test]
async fn test_list_movies_with_search() {
    let response = authed_get("/api/v1/movies?search=meridian").await;
    let body = body_json(response).await;
    let titles: Vec<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(
        titles,
        vec!["Starfall Meridian", "Meridian Underground"]
    );
}

#[tokio::test]
async fn test_search_matches_cast_members() {
    let response = authed_get("/api/v1/movies?search=okafor").await;
    let body = body_json(response).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|m| m["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["m1", "m6"]);
}

#[tokio::test]
async fn test_get_movie_by_id() {
    let response = authed_get("/api/v1/movies/m2").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["title"], "Starfall Meridian");
    assert_eq!(body["rating"], "PG-13");
}

#[tokio::test]
async fn test_get_unknown_movie_is_404() {
    let response = authed_get("/api/v1/movies/m999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["detail"], "Movie not found: m999");
}

#[tokio::test]
async fn test_movies_by_genre() {
    let response = authed_get("/api/v1/movies/by-genre/Science%20Fiction").await;
    let body = body_json(response).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|m| m["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["m2", "m6"]);
}

#[tokio::test]
async fn test_movies_by_unknown_genre_is_400_with_hint() {
    let response = authed_get("/api/v1/movies/by-genre/Musical").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("Invalid genre: Musical"));
    assert!(detail.contains("Science Fiction"));
}

#[tokio::test]
async fn test_movies_by_rating() {
    let response = authed_get("/api/v1/movies/by-rating/R").await;
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_top_rated_default_ordering() {
    let response = authed_get("/api/v1/movies/top-rated").await;
    let body = body_json(response).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|m| m["id"].as_str())
        .collect();
    // Sorted by viewer average descending: 4.7, 4.4, 4.2, 4.1, 3.9, 3.6
    assert_eq!(ids, vec!["m2", "m6", "m1", "m4", "m3", "m5"]);
}

#[tokio::test]
async fn test_top_rated_limit_bounds() {
    let response = authed_get("/api/v1/movies/top-rated?limit=2").await;
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let response = authed_get("/api/v1/movies/top-rated?limit=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = authed_get("/api/v1/movies/top-rated?limit=51").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_similar_movies() {
    // m1 (Crime/Thriller, R): m6 shares Crime+Thriller (2), m4 shares R (1)
    let response = authed_get("/api/v1/movies/m1/similar").await;
    let body = body_json(response).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|m| m["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["m6", "m4"]);
}

#[tokio::test]
async fn test_similar_movies_unknown_id_is_404() {
    let response = authed_get("/api/v1/movies/m999/similar").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_movie_reviews() {
    let response = authed_get("/api/v1/movies/m1/reviews").await;
    let body = body_json(response).await;
    let reviews = body.as_array().unwrap();
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews.first().unwrap()["id"], "r1");

    let response = authed_get("/api/v1/movies/m3/reviews").await;
    let body = body_json(response).await;
    assert!(body.as_array().unwrap().is_empty());
}

// ============================================================================
// Tool endpoints
// ============================================================================

#[tokio::test]
async fn test_suggest_movie_formats_genre_list() {
    let response = authed_get("/api/v1/tools/suggest-movie?genre=crime").await;
    assert_eq!(response.status(), StatusCode::OK);

    let text = body_text(response).await;
    assert!(text.starts_with("Here are the great Crime movies:"));
    assert!(text.contains("🎬 Night Train to Halvern"));
    assert!(text.contains("🎬 Meridian Underground"));
    assert!(text.contains("⭐ Rating: R"));
}

#[tokio::test]
async fn test_suggest_movie_invalid_genre_hint() {
    let response = authed_get("/api/v1/tools/suggest-movie?genre=opera").await;
    let text = body_text(response).await;
    assert!(text.starts_with("Invalid genre: opera."));
    assert!(text.contains("Science Fiction"));
}

#[tokio::test]
async fn test_top_movies_without_filter() {
    let response = authed_get("/api/v1/tools/top-movies").await;
    let text = body_text(response).await;
    assert!(text.starts_with("Here are the top movies:"));
    // Top five of six: everything except the lowest-rated m5
    assert!(!text.contains("Paper Lanterns"));
}

#[tokio::test]
async fn test_top_movies_with_rating_filter() {
    let response = authed_get("/api/v1/tools/top-movies?rating=pg").await;
    let text = body_text(response).await;
    assert!(text.contains("Quiet Harbor"));
    assert!(text.contains("Paper Lanterns"));
    assert!(!text.contains("Night Train"));
}

#[tokio::test]
async fn test_top_movies_invalid_rating_hint() {
    let response = authed_get("/api/v1/tools/top-movies?rating=PG14").await;
    let text = body_text(response).await;
    assert!(text.starts_with("Invalid rating: PG14."));
    assert!(text.contains("NC-17"));
}

#[tokio::test]
async fn test_search_movies_tool() {
    let response = authed_get("/api/v1/tools/search-movies?query=harbor").await;
    let text = body_text(response).await;
    assert!(text.starts_with("Here are the movies matching 'harbor':"));
    assert!(text.contains("Quiet Harbor"));
}

#[tokio::test]
async fn test_search_movies_tool_no_match() {
    let response = authed_get("/api/v1/tools/search-movies?query=zeppelin").await;
    let text = body_text(response).await;
    assert_eq!(text, "No movies found matching 'zeppelin'.");
}
