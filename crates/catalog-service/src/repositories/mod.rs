//! Movie catalog storage.
//!
//! The catalog is an immutable in-memory list loaded once at startup from a
//! JSON file. The trait seam exists so tests (and any future backing store)
//! can inject their own implementation.

use crate::models::{Genre, Movie, Rating, Review};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::path::Path;
use thiserror::Error;

/// Runtime lookup failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Movie not found: {0}")]
    MovieNotFound(String),
}

/// Startup failures while loading the catalog file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog file {path} is not a valid movie list: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The movie lookup capability consumed by handlers.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// All movies in catalog order.
    async fn list_all(&self) -> Vec<Movie>;

    /// One movie by id.
    async fn get_by_id(&self, id: &str) -> Result<Movie, StoreError>;

    /// Movies carrying the given genre.
    async fn find_by_genre(&self, genre: Genre) -> Vec<Movie>;

    /// Movies with the given audience rating.
    async fn find_by_rating(&self, rating: Rating) -> Vec<Movie>;

    /// Highest-rated movies, viewer average first, IMDB as tiebreak.
    async fn top_rated(&self, limit: usize) -> Vec<Movie>;

    /// Case-insensitive search over title, description, and cast.
    async fn search(&self, query: &str) -> Vec<Movie>;

    /// Movies similar to the given one, by shared genres and rating.
    async fn similar_to(&self, id: &str, limit: usize) -> Result<Vec<Movie>, StoreError>;

    /// Reviews attached to a movie.
    async fn reviews_for(&self, id: &str) -> Result<Vec<Review>, StoreError>;
}

/// File-backed catalog: the JSON file is read once and held in memory.
pub struct JsonFileCatalog {
    movies: Vec<Movie>,
}

impl JsonFileCatalog {
    /// Load the catalog from a JSON file containing a movie array.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path_display = path.as_ref().display().to_string();
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|source| LoadError::Io {
            path: path_display.clone(),
            source,
        })?;
        let movies: Vec<Movie> = serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
            path: path_display.clone(),
            source,
        })?;

        tracing::info!(
            target: "catalog.store",
            path = %path_display,
            movie_count = movies.len(),
            "Movie catalog loaded"
        );

        Ok(Self { movies })
    }

    /// Build a catalog from an in-memory list (tests, fixtures).
    #[must_use]
    pub fn from_movies(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    /// Number of entries held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// True when the catalog holds no movies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    fn find(&self, id: &str) -> Result<&Movie, StoreError> {
        self.movies
            .iter()
            .find(|movie| movie.id == id)
            .ok_or_else(|| StoreError::MovieNotFound(id.to_string()))
    }
}

#[async_trait]
impl MovieCatalog for JsonFileCatalog {
    async fn list_all(&self) -> Vec<Movie> {
        self.movies.clone()
    }

    async fn get_by_id(&self, id: &str) -> Result<Movie, StoreError> {
        self.find(id).cloned()
    }

    async fn find_by_genre(&self, genre: Genre) -> Vec<Movie> {
        self.movies
            .iter()
            .filter(|movie| movie.genres.contains(&genre))
            .cloned()
            .collect()
    }

    async fn find_by_rating(&self, rating: Rating) -> Vec<Movie> {
        self.movies
            .iter()
            .filter(|movie| movie.rating == rating)
            .cloned()
            .collect()
    }

    async fn top_rated(&self, limit: usize) -> Vec<Movie> {
        let mut ranked = self.movies.clone();
        ranked.sort_by(|a, b| {
            b.average_rating
                .partial_cmp(&a.average_rating)
                .unwrap_or(Ordering::Equal)
                .then(
                    b.imdb_rating
                        .unwrap_or(0.0)
                        .partial_cmp(&a.imdb_rating.unwrap_or(0.0))
                        .unwrap_or(Ordering::Equal),
                )
        });
        ranked.truncate(limit);
        ranked
    }

    async fn search(&self, query: &str) -> Vec<Movie> {
        let query = query.to_lowercase();
        self.movies
            .iter()
            .filter(|movie| {
                movie.title.to_lowercase().contains(&query)
                    || movie.description.to_lowercase().contains(&query)
                    || movie
                        .cast
                        .iter()
                        .any(|actor| actor.to_lowercase().contains(&query))
            })
            .cloned()
            .collect()
    }

    async fn similar_to(&self, id: &str, limit: usize) -> Result<Vec<Movie>, StoreError> {
        let reference = self.find(id)?;

        let mut scored: Vec<(&Movie, usize)> = self
            .movies
            .iter()
            .filter(|other| other.id != id)
            .filter_map(|other| {
                let shared_genres = other
                    .genres
                    .iter()
                    .filter(|genre| reference.genres.contains(genre))
                    .count();
                let rating_bonus = usize::from(other.rating == reference.rating);
                let score = shared_genres + rating_bonus;
                (score > 0).then_some((other, score))
            })
            .collect();

        // Stable sort keeps catalog order for equal scores
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(movie, _)| movie.clone())
            .collect())
    }

    async fn reviews_for(&self, id: &str) -> Result<Vec<Review>, StoreError> {
        Ok(self.find(id)?.reviews.clone())
    }
}
