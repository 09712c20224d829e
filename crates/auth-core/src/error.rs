//! Authentication error taxonomy.
//!
//! Every variant is terminal for the request it rejects. Display text is the
//! detailed (development) message; production callers go through
//! [`AuthError::client_detail`] which collapses everything into a generic
//! message so internal detail never reaches clients.

use crate::Environment;
use thiserror::Error;

/// Generic client-facing rejection used in production mode.
const GENERIC_REJECTION: &str = "The access token is invalid or expired";

/// Failures while fetching a JWKS document.
#[derive(Debug, Error)]
pub enum JwksError {
    /// URL scheme was not http/https, or http in production.
    #[error("JWKS URL scheme is not allowed: {0}")]
    InvalidScheme(String),

    /// Transport failure, timeout, or non-success HTTP status.
    #[error("JWKS endpoint could not be reached")]
    NetworkError,

    /// Response body was not JSON or lacked a `keys` sequence.
    #[error("JWKS document is malformed")]
    InvalidJwks,
}

/// Authentication rejection reasons.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token structure, base64, or JSON decoding failed.
    #[error("malformed token")]
    MalformedToken,

    /// Authorization header absent or not `Bearer <token>`.
    #[error("missing or invalid Authorization header")]
    MissingOrMalformedHeader,

    /// Chosen algorithm is not in the configured allow-list.
    #[error("signing algorithm '{0}' is not allowed")]
    DisallowedAlgorithm(String),

    /// Token delegates to a JWKS via `jku` but carries no `kid`.
    #[error("token has a jku header but no kid")]
    MissingKeyId,

    /// No key in the fetched JWKS matched the token's `kid`.
    #[error("no key with kid '{0}' in JWKS")]
    KeyNotFound(String),

    /// Token has no `jku` and no static secret is configured.
    #[error("no verification key configured")]
    NoKeyConfigured,

    /// JWKS retrieval failed; the token is unverifiable.
    #[error("JWKS fetch failed: {0}")]
    JwksFetchFailed(#[from] JwksError),

    /// Signature verified but the `exp` claim is in the past.
    #[error("token has expired")]
    TokenExpired,

    /// Cryptographic signature verification failed.
    #[error("token signature is invalid")]
    InvalidSignature,
}

impl AuthError {
    /// Stable machine-readable kind, used as a structured log field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MalformedToken => "malformed_token",
            AuthError::MissingOrMalformedHeader => "missing_or_malformed_header",
            AuthError::DisallowedAlgorithm(_) => "disallowed_algorithm",
            AuthError::MissingKeyId => "missing_key_id",
            AuthError::KeyNotFound(_) => "key_not_found",
            AuthError::NoKeyConfigured => "no_key_configured",
            AuthError::JwksFetchFailed(_) => "jwks_fetch_failed",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidSignature => "invalid_signature",
        }
    }

    /// Client-visible rejection detail.
    ///
    /// Development mode returns the full Display text to aid debugging;
    /// production collapses every reason into one generic message so callers
    /// cannot probe the verification pipeline.
    #[must_use]
    pub fn client_detail(&self, environment: Environment) -> String {
        if environment.is_prod() {
            GENERIC_REJECTION.to_string()
        } else {
            self.to_string()
        }
    }
}

/// Origin header rejection reasons. All map to 403 at the HTTP layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OriginError {
    /// Origin header could not be parsed as a URL with a hostname.
    #[error("invalid Origin header")]
    InvalidOrigin,

    /// Hostname did not resolve to any address.
    #[error("Origin hostname could not be resolved")]
    InvalidHostname,

    /// Hostname resolved into a private or loopback range.
    #[error("private addresses are not allowed")]
    PrivateAddressBlocked,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_client_detail_is_generic_in_prod() {
        let err = AuthError::DisallowedAlgorithm("none".to_string());
        assert_eq!(err.client_detail(Environment::Prod), GENERIC_REJECTION);
        assert!(!err
            .client_detail(Environment::Prod)
            .contains("none"));
    }

    #[test]
    fn test_client_detail_is_specific_in_dev() {
        let err = AuthError::DisallowedAlgorithm("none".to_string());
        let detail = err.client_detail(Environment::Dev);
        assert!(detail.contains("none"), "dev detail should name the alg");
    }

    #[test]
    fn test_jwks_error_wraps_into_auth_error() {
        let err: AuthError = JwksError::NetworkError.into();
        assert_eq!(err.kind(), "jwks_fetch_failed");
    }

    #[test]
    fn test_kinds_are_distinct() {
        let kinds = [
            AuthError::MalformedToken.kind(),
            AuthError::MissingOrMalformedHeader.kind(),
            AuthError::DisallowedAlgorithm("x".into()).kind(),
            AuthError::MissingKeyId.kind(),
            AuthError::KeyNotFound("x".into()).kind(),
            AuthError::NoKeyConfigured.kind(),
            AuthError::JwksFetchFailed(JwksError::InvalidJwks).kind(),
            AuthError::TokenExpired.kind(),
            AuthError::InvalidSignature.kind(),
        ];
        let unique: std::collections::HashSet<_> = kinds.iter().collect();
        assert_eq!(unique.len(), kinds.len());
    }

    #[test]
    fn test_expired_and_invalid_signature_are_distinct() {
        assert_ne!(
            AuthError::TokenExpired.kind(),
            AuthError::InvalidSignature.kind()
        );
    }
}
