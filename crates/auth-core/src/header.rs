//! Unverified JWT header parsing.
//!
//! Recovers the algorithm, type, and key-resolution hints (`kid`, `jku`)
//! from a token's first segment without verifying anything. The result
//! drives algorithm allow-listing and key resolution; the token MUST still
//! be cryptographically verified afterwards.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - This is a pure parse: no I/O, no signature checks, nothing cached

use crate::error::AuthError;
use base64::{engine::general_purpose::URL_SAFE, Engine};
use serde::Deserialize;

/// Maximum allowed token size in bytes (8KB).
///
/// Typical JWTs are a few hundred bytes; anything larger is rejected before
/// base64 decoding or JSON parsing touches it.
pub const MAX_TOKEN_SIZE_BYTES: usize = 8192;

/// Decoded, unverified JWT header fields.
///
/// Derived fresh per request and never cached. Absent fields stay `None`;
/// unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenHeader {
    /// Signing algorithm identifier.
    #[serde(default)]
    pub alg: Option<String>,

    /// Token type marker (advisory only).
    #[serde(default)]
    pub typ: Option<String>,

    /// Key id selecting one key within a JWKS.
    #[serde(default)]
    pub kid: Option<String>,

    /// JWKS URL the token delegates key lookup to.
    #[serde(default)]
    pub jku: Option<String>,
}

/// Parse the header segment of a compact JWT.
///
/// Fails with [`AuthError::MalformedToken`] when the token is oversized,
/// does not have exactly three dot-separated segments, the first segment is
/// not valid base64url (after re-padding to a multiple of 4), or the decoded
/// bytes are not a UTF-8 JSON object.
pub fn decode_header(token: &str) -> Result<TokenHeader, AuthError> {
    if token.len() > MAX_TOKEN_SIZE_BYTES {
        tracing::debug!(
            target: "auth.header",
            token_size = token.len(),
            max_size = MAX_TOKEN_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(AuthError::MalformedToken);
    }

    let mut segments = token.split('.');
    let header_segment = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(header), Some(_payload), Some(_signature), None) => header,
        _ => {
            tracing::debug!(target: "auth.header", "Token rejected: not three dot-separated segments");
            return Err(AuthError::MalformedToken);
        }
    };

    let header_bytes = decode_base64url(header_segment).ok_or_else(|| {
        tracing::debug!(target: "auth.header", "Token rejected: header segment is not valid base64url");
        AuthError::MalformedToken
    })?;

    let value: serde_json::Value = serde_json::from_slice(&header_bytes).map_err(|e| {
        tracing::debug!(target: "auth.header", error = %e, "Token rejected: header is not valid JSON");
        AuthError::MalformedToken
    })?;
    if !value.is_object() {
        tracing::debug!(target: "auth.header", "Token rejected: header is not a JSON object");
        return Err(AuthError::MalformedToken);
    }

    let header: TokenHeader = serde_json::from_value(value).map_err(|e| {
        tracing::debug!(target: "auth.header", error = %e, "Token rejected: unusable header field types");
        AuthError::MalformedToken
    })?;

    Ok(header)
}

/// Base64url-decode after re-padding with `=` to a multiple of 4 characters.
fn decode_base64url(segment: &str) -> Option<Vec<u8>> {
    let mut padded = segment.to_string();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }
    URL_SAFE.decode(padded).ok()
}
