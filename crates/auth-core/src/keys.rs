//! Verification-key resolution.
//!
//! Decides where the key material for a token comes from. The policy has
//! exactly two branches and must stay that way:
//!
//! 1. `jku` present: the token delegates to a JWKS it names; the document is
//!    fetched (through the cache) and a key is selected by `kid`.
//! 2. no `jku`: the server-side configured static secret is used.
//!
//! A token can never be satisfied by key material it carries itself; that
//! is what blocks algorithm-confusion / key-injection forgeries.

use crate::error::AuthError;
use crate::header::TokenHeader;
use crate::jwks::{Jwk, JwksCache, JwksFetcher};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

/// Resolved key material, consumed by the verification step.
#[derive(Debug, Clone)]
pub enum VerificationKey {
    /// Shared-secret bytes from server configuration.
    Symmetric(Vec<u8>),

    /// Public key record selected from a JWKS the token delegated to.
    Asymmetric(Jwk),
}

/// Resolves verification keys through the JWKS cache and fetcher.
pub struct KeyResolver {
    cache: Arc<JwksCache>,
    fetcher: Arc<JwksFetcher>,
}

impl KeyResolver {
    /// Create a resolver over an injected cache and fetcher.
    #[must_use]
    pub fn new(cache: Arc<JwksCache>, fetcher: Arc<JwksFetcher>) -> Self {
        Self { cache, fetcher }
    }

    /// Resolve the verification key for a decoded (unverified) header.
    ///
    /// # Errors
    ///
    /// - [`AuthError::JwksFetchFailed`] when the `jku` document cannot be
    ///   retrieved
    /// - [`AuthError::MissingKeyId`] for a `jku` token without `kid` (the
    ///   fetch happens first; the kid check gates key selection)
    /// - [`AuthError::KeyNotFound`] when no JWKS key matches the `kid`
    /// - [`AuthError::NoKeyConfigured`] for a non-`jku` token when no static
    ///   secret is configured
    pub async fn resolve(
        &self,
        header: &TokenHeader,
        static_secret: Option<&SecretString>,
    ) -> Result<VerificationKey, AuthError> {
        if let Some(jku) = header.jku.as_deref() {
            let document = match self.cache.get(jku).await {
                Some(document) => document,
                None => {
                    let document = self.fetcher.fetch(jku).await?;
                    self.cache.put(jku, document.clone()).await;
                    document
                }
            };

            let kid = header.kid.as_deref().ok_or_else(|| {
                tracing::debug!(target: "auth.keys", jku = %jku, "Token has jku but no kid");
                AuthError::MissingKeyId
            })?;

            let key = document
                .keys
                .iter()
                .find(|key| key.kid == kid)
                .cloned()
                .ok_or_else(|| {
                    tracing::debug!(target: "auth.keys", jku = %jku, kid = %kid, "No matching key in JWKS");
                    AuthError::KeyNotFound(kid.to_string())
                })?;

            return Ok(VerificationKey::Asymmetric(key));
        }

        match static_secret {
            Some(secret) if !secret.expose_secret().is_empty() => Ok(VerificationKey::Symmetric(
                secret.expose_secret().as_bytes().to_vec(),
            )),
            _ => {
                tracing::debug!(target: "auth.keys", "No jku and no static secret configured");
                Err(AuthError::NoKeyConfigured)
            }
        }
    }
}
