//! HTTP request handlers.

mod health;
mod info;
mod me;
mod metrics;
mod movies;
mod tools;

pub use health::{health_check, readiness_check};
pub use info::{service_docs, service_root};
pub use me::get_me;
pub use metrics::metrics_handler;
pub use movies::{
    get_movie, list_movies, movie_reviews, movies_by_genre, movies_by_rating, similar_movies,
    top_rated_movies,
};
pub use tools::{search_movies, suggest_movie, top_movies};
