//! Human-readable tool endpoints.
//!
//! These wrap the catalog into formatted text suitable for assistants and
//! command-line callers: a genre suggestion tool, a top-movies tool, and a
//! search tool. Invalid input answers with a hint string rather than an
//! error, and every call runs under an explicit per-request timeout.

use crate::models::{Genre, Movie, Rating};
use crate::routes::AppState;
use axum::extract::{Query, State};
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    pub genre: String,
}

#[derive(Debug, Deserialize)]
pub struct TopParams {
    pub rating: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
}

/// Number of entries the top-movies tool returns without a rating filter.
const TOP_MOVIES_LIMIT: usize = 5;

/// Run a tool body under the configured timeout, answering with the
/// timeout notice instead of hanging the caller.
async fn with_tool_timeout<F>(timeout: Duration, tool: &str, body: F) -> String
where
    F: Future<Output = String>,
{
    match tokio::time::timeout(timeout, body).await {
        Ok(response) => response,
        Err(_) => {
            tracing::error!(
                target: "catalog.tools",
                tool = %tool,
                timeout_seconds = timeout.as_secs(),
                "Tool call timed out"
            );
            format!(
                "Operation timed out after {} seconds. Please try again.",
                timeout.as_secs()
            )
        }
    }
}

/// Handler for GET /api/v1/tools/suggest-movie?genre= - suggest movies for
/// a genre.
#[instrument(skip_all, name = "catalog.tools.suggest_movie")]
pub async fn suggest_movie(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SuggestParams>,
) -> String {
    let timeout = Duration::from_secs(state.config.tool_timeout_seconds);
    tracing::info!(target: "catalog.tools", genre = %params.genre, "Suggesting movies");

    with_tool_timeout(timeout, "suggest_movie", async {
        match params.genre.parse::<Genre>() {
            Ok(genre) => {
                let movies = state.catalog.find_by_genre(genre).await;
                if movies.is_empty() {
                    format!("No movies found in the {genre} genre.")
                } else {
                    format_movie_list(&movies, &format!("great {genre} movies"))
                }
            }
            Err(_) => format!(
                "Invalid genre: {}. Please use one of: {}",
                params.genre,
                known(&Genre::ALL)
            ),
        }
    })
    .await
}

/// Handler for GET /api/v1/tools/top-movies?rating= - top rated movies,
/// optionally filtered by audience rating.
#[instrument(skip_all, name = "catalog.tools.top_movies")]
pub async fn top_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopParams>,
) -> String {
    let timeout = Duration::from_secs(state.config.tool_timeout_seconds);
    tracing::info!(target: "catalog.tools", rating = ?params.rating, "Listing top movies");

    with_tool_timeout(timeout, "top_movies", async {
        match params.rating.as_deref() {
            Some(raw) => match raw.parse::<Rating>() {
                Ok(rating) => {
                    let movies = state.catalog.find_by_rating(rating).await;
                    if movies.is_empty() {
                        format!("No movies found with rating {rating}.")
                    } else {
                        format_movie_list(&movies, "top movies")
                    }
                }
                Err(_) => format!(
                    "Invalid rating: {raw}. Please use one of: {}",
                    known(&Rating::ALL)
                ),
            },
            None => {
                let movies = state.catalog.top_rated(TOP_MOVIES_LIMIT).await;
                if movies.is_empty() {
                    "No movies found.".to_string()
                } else {
                    format_movie_list(&movies, "top movies")
                }
            }
        }
    })
    .await
}

/// Handler for GET /api/v1/tools/search-movies?query= - search by title,
/// description, or cast.
#[instrument(skip_all, name = "catalog.tools.search_movies")]
pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> String {
    let timeout = Duration::from_secs(state.config.tool_timeout_seconds);
    tracing::info!(target: "catalog.tools", query = %params.query, "Searching movies");

    with_tool_timeout(timeout, "search_movies", async {
        let movies = state.catalog.search(&params.query).await;
        if movies.is_empty() {
            format!("No movies found matching '{}'.", params.query)
        } else {
            format_movie_list(
                &movies,
                &format!("movies matching '{}'", params.query),
            )
        }
    })
    .await
}

/// Format a list of movies into the readable block the tools answer with.
pub fn format_movie_list(movies: &[Movie], title: &str) -> String {
    if movies.is_empty() {
        return format!("No {title} found.");
    }

    let mut response = format!("Here are the {title}:\n\n");
    for movie in movies {
        response.push_str(&format!("🎬 {}\n", movie.title));
        response.push_str(&format!("📝 {}\n", movie.description));
        response.push_str(&format!("⭐ Rating: {}\n", movie.rating));
        let genres = movie
            .genres
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        response.push_str(&format!("🎭 Genres: {genres}\n"));
        if let Some(imdb) = movie.imdb_rating {
            response.push_str(&format!("📊 IMDB Rating: {imdb}/10\n"));
        }
        response.push('\n');
    }
    response
}

fn known<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
