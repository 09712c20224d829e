//! Validated JWT claims.
//!
//! The `sub` field contains user identifiers which should not be exposed in
//! logs; a custom Debug implementation redacts it. All claims beyond the two
//! the engine relies on (`sub`, `exp`) are preserved in `extra` so request
//! handlers see the full payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Claims extracted from a verified token.
#[derive(Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user or client identifier) - redacted in Debug output.
    pub sub: String,

    /// Expiration timestamp (Unix epoch seconds), already validated.
    pub exp: i64,

    /// Remaining claim payload, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &"[REDACTED]")
            .field("exp", &self.exp)
            .field("extra_keys", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Claims {
    /// Short subject prefix safe for production logs.
    ///
    /// Returns at most the first 8 characters of `sub`, so operators can
    /// correlate requests without full identifiers landing in log storage.
    #[must_use]
    pub fn sub_prefix(&self) -> String {
        self.sub.chars().take(8).collect()
    }

    /// Look up an additional claim by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}
