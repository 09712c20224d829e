//! Movie domain models.
//!
//! These mirror the catalog's JSON data file. The service treats the movie
//! domain as simple glue over this data; the interesting machinery lives in
//! `auth-core`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Movie genres carried by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Adventure,
    Comedy,
    Crime,
    Drama,
    Fantasy,
    Horror,
    Mystery,
    Romance,
    #[serde(rename = "Science Fiction")]
    ScienceFiction,
    Thriller,
}

impl Genre {
    /// Every known genre, for hint messages.
    pub const ALL: [Genre; 11] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Comedy,
        Genre::Crime,
        Genre::Drama,
        Genre::Fantasy,
        Genre::Horror,
        Genre::Mystery,
        Genre::Romance,
        Genre::ScienceFiction,
        Genre::Thriller,
    ];
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Comedy => "Comedy",
            Genre::Crime => "Crime",
            Genre::Drama => "Drama",
            Genre::Fantasy => "Fantasy",
            Genre::Horror => "Horror",
            Genre::Mystery => "Mystery",
            Genre::Romance => "Romance",
            Genre::ScienceFiction => "Science Fiction",
            Genre::Thriller => "Thriller",
        };
        write!(f, "{name}")
    }
}

/// Error for unknown genre names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown genre '{0}'")]
pub struct UnknownGenre(pub String);

impl FromStr for Genre {
    type Err = UnknownGenre;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "action" => Ok(Genre::Action),
            "adventure" => Ok(Genre::Adventure),
            "comedy" => Ok(Genre::Comedy),
            "crime" => Ok(Genre::Crime),
            "drama" => Ok(Genre::Drama),
            "fantasy" => Ok(Genre::Fantasy),
            "horror" => Ok(Genre::Horror),
            "mystery" => Ok(Genre::Mystery),
            "romance" => Ok(Genre::Romance),
            "science fiction" | "science-fiction" | "sci-fi" => Ok(Genre::ScienceFiction),
            "thriller" => Ok(Genre::Thriller),
            _ => Err(UnknownGenre(s.to_string())),
        }
    }
}

/// Audience ratings (MPAA style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    G,
    PG,
    #[serde(rename = "PG-13")]
    Pg13,
    R,
    #[serde(rename = "NC-17")]
    Nc17,
}

impl Rating {
    /// Every known rating, for hint messages.
    pub const ALL: [Rating; 5] = [Rating::G, Rating::PG, Rating::Pg13, Rating::R, Rating::Nc17];
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rating::G => "G",
            Rating::PG => "PG",
            Rating::Pg13 => "PG-13",
            Rating::R => "R",
            Rating::Nc17 => "NC-17",
        };
        write!(f, "{name}")
    }
}

/// Error for unknown rating names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rating '{0}'")]
pub struct UnknownRating(pub String);

impl FromStr for Rating {
    type Err = UnknownRating;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "G" => Ok(Rating::G),
            "PG" => Ok(Rating::PG),
            "PG-13" => Ok(Rating::Pg13),
            "R" => Ok(Rating::R),
            "NC-17" => Ok(Rating::Nc17),
            _ => Err(UnknownRating(s.to_string())),
        }
    }
}

/// One viewer review attached to a movie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub movie_id: String,
    pub user_id: String,
    /// Star rating, 0..=5.
    pub rating: f64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub helpful_votes: u32,
}

/// One catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Duration in minutes.
    pub duration: u32,
    pub genres: Vec<Genre>,
    pub rating: Rating,
    pub release_date: DateTime<Utc>,
    pub director: String,
    pub cast: Vec<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    /// Viewer average, 0..=5.
    pub average_rating: f64,
    pub total_reviews: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotten_tomatoes_score: Option<u8>,
}

/// Liveness/readiness probe payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    /// Number of catalog entries loaded, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_entries: Option<usize>,
    /// Whether request authentication is enabled.
    pub auth_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
