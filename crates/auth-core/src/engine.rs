//! The per-request authentication decision pipeline.
//!
//! Orchestrates header decoding, algorithm allow-listing, key resolution,
//! and signature/claim verification into a single accept/reject decision,
//! and decides which request paths are exempt.
//!
//! The pipeline for one request:
//!
//! 1. path exclusion (explicit allow-list, exact match)
//! 2. Bearer token extraction and a cheap length sanity check
//! 3. unverified header decode
//! 4. algorithm allow-list check (before any key work; closes `alg: none`)
//! 5. token-type advisory check (warn only)
//! 6. key resolution (the only step that may touch the network)
//! 7. signature + expiry verification
//!
//! Every failure is terminal and maps to 401 at the HTTP layer; JWKS
//! network trouble rejects the token rather than erroring the server.

use crate::claims::Claims;
use crate::error::AuthError;
use crate::header::decode_header;
use crate::jwks::Jwk;
use crate::keys::{KeyResolver, VerificationKey};
use crate::Environment;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use secrecy::SecretString;
use std::collections::HashSet;

/// Minimum plausible compact-JWT length, checked before decoding.
const MIN_TOKEN_LENGTH: usize = 10;

/// Process-wide authentication policy, built once at startup.
pub struct AuthPolicy {
    /// Deployment environment (gates client detail and JWKS schemes).
    pub environment: Environment,

    /// Algorithm assumed when the token header carries none.
    pub default_algorithm: String,

    /// Allow-listed signing algorithms.
    pub allowed_algorithms: HashSet<String>,

    /// Accepted `typ` markers; anything else logs a warning (soft check).
    pub accepted_token_types: HashSet<String>,

    /// Static shared secret for non-`jku` tokens. May be absent.
    pub static_secret: Option<SecretString>,

    /// Exact request paths that bypass authentication entirely.
    pub excluded_paths: HashSet<String>,
}

impl AuthPolicy {
    /// Policy with the default algorithm set (HS256 only), default excluded
    /// paths, and no static secret.
    #[must_use]
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            default_algorithm: "HS256".to_string(),
            allowed_algorithms: HashSet::from(["HS256".to_string()]),
            accepted_token_types: HashSet::from(["JWT".to_string(), "at+jwt".to_string()]),
            static_secret: None,
            excluded_paths: ["/", "/health", "/ready", "/metrics", "/docs"]
                .into_iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Outcome of [`AuthEngine::authenticate`].
#[derive(Debug)]
pub enum AuthDecision {
    /// Path is on the exclusion list; request passes through unauthenticated.
    Skip,

    /// Token verified; claims are attached to the request.
    Authenticated(Claims),

    /// Terminal rejection; maps to 401.
    Rejected(AuthError),
}

/// The authentication decision engine.
///
/// Owns the policy and the key resolver; constructed once at the service's
/// composition root and shared across requests.
pub struct AuthEngine {
    policy: AuthPolicy,
    resolver: KeyResolver,
}

impl AuthEngine {
    /// Build an engine from a policy and an injected key resolver.
    #[must_use]
    pub fn new(policy: AuthPolicy, resolver: KeyResolver) -> Self {
        Self { policy, resolver }
    }

    /// The environment this engine runs in.
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.policy.environment
    }

    /// Decide whether a request may proceed.
    ///
    /// `path` is the request path, `authorization` the raw Authorization
    /// header value if present.
    pub async fn authenticate(&self, path: &str, authorization: Option<&str>) -> AuthDecision {
        if self.policy.excluded_paths.contains(path) {
            tracing::debug!(target: "auth.engine", path = %path, "Path excluded from authentication");
            return AuthDecision::Skip;
        }

        match self.check(authorization).await {
            Ok(claims) => {
                if self.policy.environment.is_prod() {
                    tracing::info!(
                        target: "auth.engine",
                        sub = %claims.sub_prefix(),
                        "Request authenticated"
                    );
                } else {
                    tracing::debug!(
                        target: "auth.engine",
                        sub = %claims.sub,
                        "Request authenticated"
                    );
                }
                AuthDecision::Authenticated(claims)
            }
            Err(error) => {
                tracing::warn!(
                    target: "auth.engine",
                    path = %path,
                    kind = %error.kind(),
                    "Request rejected"
                );
                AuthDecision::Rejected(error)
            }
        }
    }

    async fn check(&self, authorization: Option<&str>) -> Result<Claims, AuthError> {
        let auth_header = authorization.ok_or(AuthError::MissingOrMalformedHeader)?;
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MissingOrMalformedHeader)?;

        if token.len() < MIN_TOKEN_LENGTH {
            return Err(AuthError::MalformedToken);
        }

        let header = decode_header(token)?;

        let alg_name = header
            .alg
            .clone()
            .unwrap_or_else(|| self.policy.default_algorithm.clone());
        if !self.policy.allowed_algorithms.contains(&alg_name) {
            return Err(AuthError::DisallowedAlgorithm(alg_name));
        }
        let algorithm: Algorithm = alg_name
            .parse()
            .map_err(|_| AuthError::DisallowedAlgorithm(alg_name.clone()))?;

        if let Some(typ) = header.typ.as_deref() {
            let accepted = self
                .policy
                .accepted_token_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(typ));
            if !accepted {
                tracing::warn!(target: "auth.engine", typ = %typ, "Unexpected token type marker");
            }
        }

        let key = self
            .resolver
            .resolve(&header, self.policy.static_secret.as_ref())
            .await?;

        verify(token, algorithm, &key)
    }
}

/// Verify signature and claims against the resolved key.
fn verify(token: &str, algorithm: Algorithm, key: &VerificationKey) -> Result<Claims, AuthError> {
    let decoding_key = match key {
        VerificationKey::Symmetric(bytes) => DecodingKey::from_secret(bytes),
        VerificationKey::Asymmetric(jwk) => decoding_key_from_jwk(jwk)?,
    };

    let mut validation = Validation::new(algorithm);
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp"]);
    validation.validate_aud = false;

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(target: "auth.engine", error = %e, "Token verification failed");
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_)
            | ErrorKind::MissingRequiredClaim(_) => AuthError::MalformedToken,
            _ => AuthError::InvalidSignature,
        }
    })?;

    Ok(token_data.claims)
}

/// Build a decoding key from JWKS key material by key type.
fn decoding_key_from_jwk(jwk: &Jwk) -> Result<DecodingKey, AuthError> {
    match jwk.kty.as_str() {
        "oct" => {
            let k = require_material(jwk, jwk.k.as_deref(), "k")?;
            let secret = URL_SAFE_NO_PAD.decode(k).map_err(|e| {
                tracing::warn!(target: "auth.engine", kid = %jwk.kid, error = %e, "Invalid oct key encoding");
                AuthError::InvalidSignature
            })?;
            Ok(DecodingKey::from_secret(&secret))
        }
        "RSA" => {
            let n = require_material(jwk, jwk.n.as_deref(), "n")?;
            let e = require_material(jwk, jwk.e.as_deref(), "e")?;
            DecodingKey::from_rsa_components(n, e).map_err(|err| {
                tracing::warn!(target: "auth.engine", kid = %jwk.kid, error = %err, "Invalid RSA key components");
                AuthError::InvalidSignature
            })
        }
        "OKP" => {
            let x = require_material(jwk, jwk.x.as_deref(), "x")?;
            let public_key = URL_SAFE_NO_PAD.decode(x).map_err(|e| {
                tracing::warn!(target: "auth.engine", kid = %jwk.kid, error = %e, "Invalid OKP key encoding");
                AuthError::InvalidSignature
            })?;
            Ok(DecodingKey::from_ed_der(&public_key))
        }
        other => {
            tracing::warn!(target: "auth.engine", kid = %jwk.kid, kty = %other, "Unsupported JWK key type");
            Err(AuthError::InvalidSignature)
        }
    }
}

fn require_material<'a>(
    jwk: &Jwk,
    field: Option<&'a str>,
    name: &'static str,
) -> Result<&'a str, AuthError> {
    field.ok_or_else(|| {
        tracing::warn!(target: "auth.engine", kid = %jwk.kid, field = %name, "JWK missing key material field");
        AuthError::InvalidSignature
    })
}
