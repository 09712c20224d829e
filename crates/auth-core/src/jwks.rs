//! JWKS fetching and caching.
//!
//! [`JwksFetcher`] performs the outbound retrieval of a JWKS document with
//! scheme validation and bounded timeouts over one pooled HTTP client.
//! [`JwksCache`] maps a JWKS URL to its fetched document with a TTL and an
//! LRU capacity bound. The two are deliberately separate: the fetcher knows
//! nothing about caching, and the key resolver composes them.
//!
//! # Concurrency
//!
//! The cache is safe for concurrent use from many in-flight requests. There
//! is no per-URL locking: two concurrent misses for the same URL may both
//! fetch, and the later `put` wins. The lock is never held across an await
//! point.

use crate::error::JwksError;
use crate::Environment;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use url::Url;

/// Default cache time-to-live: one hour.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Default cache capacity in entries.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// JWKS fetch connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// JWKS fetch total request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Keep-alive connections retained per host.
const MAX_IDLE_CONNECTIONS: usize = 20;

/// One key from a JWKS document.
///
/// Key-material fields are algorithm-specific: `k` for symmetric (oct)
/// keys, `n`/`e` for RSA, `crv`/`x` for OKP (Ed25519).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    /// Key ID - selects this key within the set.
    pub kid: String,

    /// Key type (`oct`, `RSA`, `OKP`).
    pub kty: String,

    /// Algorithm hint (e.g. `HS256`, `RS256`, `EdDSA`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,

    /// Symmetric key material, base64url (oct keys).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,

    /// RSA modulus, base64url.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,

    /// RSA public exponent, base64url.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,

    /// Curve name (OKP keys).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,

    /// Public key value, base64url (OKP keys).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,

    /// Key use (`sig` expected).
    #[serde(default, rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
}

/// A fetched JWKS document. Immutable once fetched; a re-fetch replaces the
/// cached document wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwksDocument {
    /// The key sequence.
    pub keys: Vec<Jwk>,
}

struct CacheEntry {
    document: JwksDocument,
    inserted_at: Instant,
}

/// Thread-safe, TTL and capacity bounded JWKS cache.
///
/// Expired entries are logically absent: a lookup past the TTL evicts the
/// entry and reports a miss. At capacity the least-recently-used entry is
/// evicted; a hit refreshes recency.
pub struct JwksCache {
    ttl: Duration,
    entries: Mutex<LruCache<String, CacheEntry>>,
}

impl Default for JwksCache {
    fn default() -> Self {
        Self::new()
    }
}

impl JwksCache {
    /// Create a cache with the default TTL (3600s) and capacity (100).
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_CACHE_TTL, DEFAULT_CACHE_CAPACITY)
    }

    /// Create a cache with explicit TTL and capacity. A zero capacity is
    /// clamped to one entry.
    #[must_use]
    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            ttl,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Look up a JWKS document. A miss (absent or expired) is `None`, never
    /// an error.
    pub async fn get(&self, url: &str) -> Option<JwksDocument> {
        let mut entries = self.entries.lock().await;
        let expired = match entries.get(url) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                tracing::debug!(target: "auth.jwks", url = %url, "JWKS cache hit");
                return Some(entry.document.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(url);
            tracing::debug!(target: "auth.jwks", url = %url, "JWKS cache entry expired");
        }
        None
    }

    /// Insert or overwrite a document with the current timestamp.
    pub async fn put(&self, url: &str, document: JwksDocument) {
        let mut entries = self.entries.lock().await;
        entries.put(
            url.to_string(),
            CacheEntry {
                document,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Number of entries currently held (including not-yet-evicted expired
    /// ones).
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// True when the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Fetches JWKS documents over one pooled HTTP client.
pub struct JwksFetcher {
    client: reqwest::Client,
    environment: Environment,
}

impl JwksFetcher {
    /// Build a fetcher with a pooled client: 5s connect / 10s total
    /// timeouts, redirects followed, at most 20 idle keep-alive connections
    /// per host.
    #[must_use]
    pub fn new(environment: Environment) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .pool_max_idle_per_host(MAX_IDLE_CONNECTIONS)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(
                    target: "auth.jwks",
                    error = %e,
                    "Failed to build HTTP client with custom config, using defaults"
                );
                reqwest::Client::new()
            });

        Self {
            client,
            environment,
        }
    }

    /// Fetch and parse the JWKS at `url`.
    ///
    /// # Errors
    ///
    /// - [`JwksError::InvalidScheme`] for non-http(s) URLs, or plain http in
    ///   production
    /// - [`JwksError::NetworkError`] on transport failure, timeout, or a
    ///   non-success status
    /// - [`JwksError::InvalidJwks`] when the body is not JSON or lacks a
    ///   `keys` sequence
    pub async fn fetch(&self, url: &str) -> Result<JwksDocument, JwksError> {
        self.validate_scheme(url)?;

        tracing::debug!(target: "auth.jwks", url = %url, "Fetching JWKS");

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::warn!(target: "auth.jwks", url = %url, error = %e, "JWKS fetch failed");
            JwksError::NetworkError
        })?;

        if !response.status().is_success() {
            tracing::warn!(
                target: "auth.jwks",
                url = %url,
                status = %response.status(),
                "JWKS endpoint returned error status"
            );
            return Err(JwksError::NetworkError);
        }

        let body = response.text().await.map_err(|e| {
            tracing::warn!(target: "auth.jwks", url = %url, error = %e, "Failed to read JWKS body");
            JwksError::NetworkError
        })?;

        let document: JwksDocument = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(target: "auth.jwks", url = %url, error = %e, "JWKS body is not a valid key set");
            JwksError::InvalidJwks
        })?;

        tracing::info!(
            target: "auth.jwks",
            url = %url,
            key_count = document.keys.len(),
            "JWKS fetched"
        );

        Ok(document)
    }

    fn validate_scheme(&self, url: &str) -> Result<(), JwksError> {
        let parsed = Url::parse(url).map_err(|e| {
            tracing::debug!(target: "auth.jwks", url = %url, error = %e, "JWKS URL did not parse");
            JwksError::InvalidScheme(url.to_string())
        })?;

        match parsed.scheme() {
            "https" => Ok(()),
            "http" if !self.environment.is_prod() => Ok(()),
            scheme => {
                tracing::warn!(
                    target: "auth.jwks",
                    url = %url,
                    scheme = %scheme,
                    environment = %self.environment,
                    "JWKS URL scheme rejected"
                );
                Err(JwksError::InvalidScheme(scheme.to_string()))
            }
        }
    }
}
