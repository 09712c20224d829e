//! Movie catalog REST handlers.
//!
//! Thin glue over the catalog trait: parse parameters, delegate, map lookup
//! misses to 404. All routes here sit behind the auth middleware.

use crate::errors::CatalogError;
use crate::models::{Genre, Movie, Rating, Review};
use crate::repositories::StoreError;
use crate::routes::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

/// Default and maximum limits for the top-rated listing.
const TOP_RATED_DEFAULT_LIMIT: usize = 10;
const TOP_RATED_MAX_LIMIT: usize = 50;

/// Default and maximum limits for the similarity listing.
const SIMILAR_DEFAULT_LIMIT: usize = 5;
const SIMILAR_MAX_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Optional case-insensitive search over title/description/cast.
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<usize>,
}

fn bounded_limit(
    requested: Option<usize>,
    default: usize,
    max: usize,
) -> Result<usize, CatalogError> {
    let limit = requested.unwrap_or(default);
    if limit == 0 || limit > max {
        return Err(CatalogError::BadRequest(format!(
            "limit must be between 1 and {max}"
        )));
    }
    Ok(limit)
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MovieNotFound(id) => CatalogError::NotFound(format!("Movie not found: {id}")),
        }
    }
}

/// Handler for GET /api/v1/movies - all movies, optionally filtered by
/// `?search=`.
#[instrument(skip_all, name = "catalog.handlers.list_movies")]
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Movie>> {
    let movies = match params.search.as_deref().map(str::trim) {
        Some(query) if !query.is_empty() => state.catalog.search(query).await,
        _ => state.catalog.list_all().await,
    };
    Json(movies)
}

/// Handler for GET /api/v1/movies/by-genre/{genre}
#[instrument(skip_all, name = "catalog.handlers.movies_by_genre")]
pub async fn movies_by_genre(
    State(state): State<Arc<AppState>>,
    Path(genre): Path<String>,
) -> Result<Json<Vec<Movie>>, CatalogError> {
    let genre: Genre = genre.parse().map_err(|_| {
        CatalogError::BadRequest(format!(
            "Invalid genre: {genre}. Please use one of: {}",
            known_genres()
        ))
    })?;
    Ok(Json(state.catalog.find_by_genre(genre).await))
}

/// Handler for GET /api/v1/movies/by-rating/{rating}
#[instrument(skip_all, name = "catalog.handlers.movies_by_rating")]
pub async fn movies_by_rating(
    State(state): State<Arc<AppState>>,
    Path(rating): Path<String>,
) -> Result<Json<Vec<Movie>>, CatalogError> {
    let rating: Rating = rating.parse().map_err(|_| {
        CatalogError::BadRequest(format!(
            "Invalid rating: {rating}. Please use one of: {}",
            known_ratings()
        ))
    })?;
    Ok(Json(state.catalog.find_by_rating(rating).await))
}

/// Handler for GET /api/v1/movies/top-rated?limit=
#[instrument(skip_all, name = "catalog.handlers.top_rated")]
pub async fn top_rated_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitParams>,
) -> Result<Json<Vec<Movie>>, CatalogError> {
    let limit = bounded_limit(params.limit, TOP_RATED_DEFAULT_LIMIT, TOP_RATED_MAX_LIMIT)?;
    Ok(Json(state.catalog.top_rated(limit).await))
}

/// Handler for GET /api/v1/movies/{id}
#[instrument(skip_all, name = "catalog.handlers.get_movie")]
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Movie>, CatalogError> {
    Ok(Json(state.catalog.get_by_id(&id).await?))
}

/// Handler for GET /api/v1/movies/{id}/similar?limit=
#[instrument(skip_all, name = "catalog.handlers.similar_movies")]
pub async fn similar_movies(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<LimitParams>,
) -> Result<Json<Vec<Movie>>, CatalogError> {
    let limit = bounded_limit(params.limit, SIMILAR_DEFAULT_LIMIT, SIMILAR_MAX_LIMIT)?;
    Ok(Json(state.catalog.similar_to(&id, limit).await?))
}

/// Handler for GET /api/v1/movies/{id}/reviews
#[instrument(skip_all, name = "catalog.handlers.movie_reviews")]
pub async fn movie_reviews(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Review>>, CatalogError> {
    Ok(Json(state.catalog.reviews_for(&id).await?))
}

fn known_genres() -> String {
    Genre::ALL
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn known_ratings() -> String {
    Rating::ALL
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
