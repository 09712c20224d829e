//! Catalog Service Library
//!
//! The Marquee movie catalog service: a small REST API plus human-readable
//! "tool" endpoints over an in-memory movie list, guarded by the JWT
//! authentication engine from `auth-core`.
//!
//! # Architecture
//!
//! ```text
//! routes.rs -> middleware/*.rs -> handlers/*.rs -> repositories/*.rs
//! ```
//!
//! The binary's composition root constructs the JWKS cache, fetcher, key
//! resolver and auth engine explicitly and injects them into the router
//! state, so tests can swap in isolated instances.
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - Auth, origin, and metrics middleware
//! - `models` - Movie domain models
//! - `observability` - Prometheus metrics
//! - `repositories` - Movie catalog storage
//! - `routes` - Axum router setup

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
