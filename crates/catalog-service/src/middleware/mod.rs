//! Request middleware.
//!
//! The chain is composed explicitly in `routes.rs`; each middleware wraps
//! the next and can short-circuit with an error response:
//!
//! - `http_metrics` (outermost) - records every response
//! - `origin` - Origin header validation, 403 on rejection
//! - `auth` - JWT verification on protected routes, 401 on rejection

pub mod auth;
pub mod http_metrics;
pub mod origin;

pub use auth::{require_auth, AuthState, ClaimsExt};
pub use http_metrics::http_metrics_middleware;
pub use origin::{origin_guard, OriginState};
