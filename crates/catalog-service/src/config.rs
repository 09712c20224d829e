//! Catalog service configuration.
//!
//! Configuration is loaded from environment variables once at startup. The
//! JWT secret is held as a `SecretString` so Debug output never exposes it.

use auth_core::Environment;
use secrecy::SecretString;
use std::collections::{HashMap, HashSet};
use std::env;
use std::fmt;
use thiserror::Error;

/// Default server bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default signing algorithm assumed when a token names none.
pub const DEFAULT_JWT_ALGORITHM: &str = "HS256";

/// Default JWKS cache time-to-live in seconds.
pub const DEFAULT_JWKS_CACHE_TTL_SECONDS: u64 = 3600;

/// Default JWKS cache capacity in entries.
pub const DEFAULT_JWKS_CACHE_CAPACITY: usize = 100;

/// Default per-call timeout for tool endpoints in seconds.
pub const DEFAULT_TOOL_TIMEOUT_SECONDS: u64 = 10;

/// Default movie data file.
pub const DEFAULT_MOVIE_DATA_PATH: &str = "data/movies.json";

/// Paths that bypass authentication unless overridden.
const DEFAULT_EXCLUDED_PATHS: [&str; 5] = ["/", "/health", "/ready", "/metrics", "/docs"];

/// Catalog service configuration.
///
/// Loaded from environment variables with sensible defaults. The JWT secret
/// is redacted in Debug output via `SecretString`.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Deployment environment (`dev` | `prod`).
    pub environment: Environment,

    /// Whether the JWT middleware is applied at all.
    pub enable_auth: bool,

    /// Static shared secret for non-jku tokens. May be absent.
    pub jwt_secret: Option<SecretString>,

    /// Algorithm assumed when the token header names none.
    pub jwt_default_algorithm: String,

    /// Allow-listed signing algorithms.
    pub jwt_allowed_algorithms: HashSet<String>,

    /// Hostnames the origin guard accepts without resolution.
    pub allowed_hosts: HashSet<String>,

    /// Exact paths that bypass authentication.
    pub auth_excluded_paths: HashSet<String>,

    /// JWKS cache TTL in seconds.
    pub jwks_cache_ttl_seconds: u64,

    /// JWKS cache capacity in entries.
    pub jwks_cache_capacity: usize,

    /// Path to the movie catalog JSON file.
    pub movie_data_path: String,

    /// Per-call timeout for tool endpoints in seconds.
    pub tool_timeout_seconds: u64,
}

/// Custom Debug implementation that keeps the secret redacted and the rest
/// readable.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("environment", &self.environment)
            .field("enable_auth", &self.enable_auth)
            .field(
                "jwt_secret",
                &self.jwt_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("jwt_default_algorithm", &self.jwt_default_algorithm)
            .field("jwt_allowed_algorithms", &self.jwt_allowed_algorithms)
            .field("allowed_hosts", &self.allowed_hosts)
            .field("auth_excluded_paths", &self.auth_excluded_paths)
            .field("jwks_cache_ttl_seconds", &self.jwks_cache_ttl_seconds)
            .field("jwks_cache_capacity", &self.jwks_cache_capacity)
            .field("movie_data_path", &self.movie_data_path)
            .field("tool_timeout_seconds", &self.tool_timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid APP_ENV: {0}")]
    InvalidEnvironment(String),

    #[error("Invalid JWKS cache configuration: {0}")]
    InvalidJwksCache(String),

    #[error("Invalid tool timeout configuration: {0}")]
    InvalidToolTimeout(String),

    #[error("Invalid boolean for {0}: expected 'true' or 'false', got '{1}'")]
    InvalidBool(String, String),

    #[error("JWT_ALLOWED_ALGORITHMS must not be empty")]
    EmptyAlgorithmList,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let environment = match vars.get("APP_ENV") {
            Some(value) => value
                .parse::<Environment>()
                .map_err(|e| ConfigError::InvalidEnvironment(e.to_string()))?,
            None => Environment::Dev,
        };

        let enable_auth = parse_bool(vars, "ENABLE_AUTH", true)?;

        let jwt_secret = vars
            .get("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .map(|s| SecretString::from(s.clone()));

        let jwt_default_algorithm = vars
            .get("JWT_DEFAULT_ALGORITHM")
            .cloned()
            .unwrap_or_else(|| DEFAULT_JWT_ALGORITHM.to_string());

        let jwt_allowed_algorithms = match vars.get("JWT_ALLOWED_ALGORITHMS") {
            Some(value) => {
                let set = parse_set(value);
                if set.is_empty() {
                    return Err(ConfigError::EmptyAlgorithmList);
                }
                set
            }
            None => HashSet::from([DEFAULT_JWT_ALGORITHM.to_string()]),
        };

        let allowed_hosts = vars
            .get("ALLOWED_HOSTS")
            .map(|value| parse_set(value))
            .unwrap_or_else(|| HashSet::from(["localhost".to_string()]));

        let auth_excluded_paths = vars
            .get("AUTH_EXCLUDED_PATHS")
            .map(|value| parse_set(value))
            .unwrap_or_else(|| {
                DEFAULT_EXCLUDED_PATHS
                    .into_iter()
                    .map(ToString::to_string)
                    .collect()
            });

        let jwks_cache_ttl_seconds = parse_positive_u64(
            vars,
            "JWKS_CACHE_TTL_SECONDS",
            DEFAULT_JWKS_CACHE_TTL_SECONDS,
            ConfigError::InvalidJwksCache,
        )?;

        let jwks_cache_capacity = usize::try_from(parse_positive_u64(
            vars,
            "JWKS_CACHE_CAPACITY",
            DEFAULT_JWKS_CACHE_CAPACITY as u64,
            ConfigError::InvalidJwksCache,
        )?)
        .map_err(|e| ConfigError::InvalidJwksCache(e.to_string()))?;

        let tool_timeout_seconds = parse_positive_u64(
            vars,
            "TOOL_TIMEOUT_SECONDS",
            DEFAULT_TOOL_TIMEOUT_SECONDS,
            ConfigError::InvalidToolTimeout,
        )?;

        let movie_data_path = vars
            .get("MOVIE_DATA_PATH")
            .cloned()
            .unwrap_or_else(|| DEFAULT_MOVIE_DATA_PATH.to_string());

        Ok(Config {
            bind_address,
            environment,
            enable_auth,
            jwt_secret,
            jwt_default_algorithm,
            jwt_allowed_algorithms,
            allowed_hosts,
            auth_excluded_paths,
            jwks_cache_ttl_seconds,
            jwks_cache_capacity,
            movie_data_path,
            tool_timeout_seconds,
        })
    }
}

/// Split a comma-separated variable into a trimmed set, dropping empties.
fn parse_set(value: &str) -> HashSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn parse_bool(
    vars: &HashMap<String, String>,
    name: &str,
    default: bool,
) -> Result<bool, ConfigError> {
    match vars.get(name) {
        None => Ok(default),
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(ConfigError::InvalidBool(
                name.to_string(),
                other.to_string(),
            )),
        },
    }
}

fn parse_positive_u64(
    vars: &HashMap<String, String>,
    name: &str,
    default: u64,
    make_error: fn(String) -> ConfigError,
) -> Result<u64, ConfigError> {
    match vars.get(name) {
        None => Ok(default),
        Some(value_str) => {
            let value: u64 = value_str.parse().map_err(|e| {
                make_error(format!(
                    "{name} must be a valid positive integer, got '{value_str}': {e}"
                ))
            })?;
            if value == 0 {
                return Err(make_error(format!("{name} must be greater than 0")));
            }
            Ok(value)
        }
    }
}
