//! JWT authentication core for Marquee services.
//!
//! This crate is the framework-neutral authentication engine used by the
//! catalog service. It owns the security-sensitive half of request handling:
//!
//! - `header` - unverified JWT header parsing (alg/typ/kid/jku hints)
//! - `jwks` - JWKS document fetching and a TTL + LRU bounded cache
//! - `keys` - verification-key resolution (static secret vs. JWKS lookup)
//! - `engine` - the per-request accept/reject decision pipeline
//! - `origin` - Origin header validation with private-address blocking
//! - `claims` - validated claims with log-safe Debug output
//!
//! # Security
//!
//! - Key material comes from exactly two places: the server-side configured
//!   secret, or a JWKS the token explicitly delegates to via `jku` (selected
//!   by `kid`). Tokens can never supply their own key material directly.
//! - The signing algorithm is checked against a configured allow-list before
//!   any key work, independent of what the token claims.
//! - All failures are terminal for the request and fail closed; JWKS network
//!   failures reject the token (401), they never surface as server errors.
//! - Client-visible rejection detail is suppressed in production.

pub mod claims;
pub mod engine;
pub mod error;
pub mod header;
pub mod jwks;
pub mod keys;
pub mod origin;

pub use claims::Claims;
pub use engine::{AuthDecision, AuthEngine, AuthPolicy};
pub use error::{AuthError, JwksError, OriginError};
pub use header::TokenHeader;
pub use jwks::{Jwk, JwksCache, JwksDocument, JwksFetcher};
pub use keys::{KeyResolver, VerificationKey};
pub use origin::OriginGuard;

use std::fmt;
use std::str::FromStr;

/// Deployment environment, gating HTTPS-only JWKS fetches and how much
/// rejection detail clients are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Development: http JWKS URLs allowed, detailed rejection messages.
    Dev,
    /// Production: https-only JWKS, generic rejection messages, redacted
    /// subject identifiers in logs.
    Prod,
}

impl Environment {
    /// True when running in production mode.
    #[must_use]
    pub fn is_prod(self) -> bool {
        matches!(self, Environment::Prod)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Dev => write!(f, "dev"),
            Environment::Prod => write!(f, "prod"),
        }
    }
}

/// Error returned when an environment string is not `dev` or `prod`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown environment '{0}', expected 'dev' or 'prod'")]
pub struct UnknownEnvironment(String);

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            other => Err(UnknownEnvironment(other.to_string())),
        }
    }
}
