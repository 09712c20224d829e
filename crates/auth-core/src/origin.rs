//! Origin header validation.
//!
//! Browser-sent Origin headers are checked against a host allow-list;
//! anything else must resolve to a public address. Requests with no Origin
//! header (non-browser clients) are allowed through. Every parse failure
//! rejects - this guard fails closed.

use crate::error::OriginError;
use std::collections::HashSet;
use std::net::IpAddr;
use url::{Host, Url};

/// Validates request Origin headers against an allow-list and blocks
/// private/loopback targets.
pub struct OriginGuard {
    allowed_hosts: HashSet<String>,
}

impl OriginGuard {
    /// Create a guard over the configured allow-listed hostnames.
    #[must_use]
    pub fn new(allowed_hosts: HashSet<String>) -> Self {
        Self { allowed_hosts }
    }

    /// Validate an Origin header value.
    ///
    /// - absent header: allow
    /// - allow-listed hostname: allow without resolution
    /// - otherwise: resolve and reject private/loopback targets
    ///
    /// # Errors
    ///
    /// - [`OriginError::InvalidOrigin`] when the value does not parse as a
    ///   URL with a hostname
    /// - [`OriginError::InvalidHostname`] when resolution fails
    /// - [`OriginError::PrivateAddressBlocked`] for loopback/private ranges
    ///   (127.0.0.0/8, 10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16)
    pub async fn validate(&self, origin: Option<&str>) -> Result<(), OriginError> {
        let Some(origin) = origin else {
            return Ok(());
        };

        let parsed = Url::parse(origin).map_err(|e| {
            tracing::debug!(target: "auth.origin", origin = %origin, error = %e, "Origin did not parse");
            OriginError::InvalidOrigin
        })?;

        let host = parsed.host().ok_or_else(|| {
            tracing::debug!(target: "auth.origin", origin = %origin, "Origin has no hostname");
            OriginError::InvalidOrigin
        })?;

        match host {
            Host::Domain(domain) => {
                if self.allowed_hosts.contains(domain) {
                    return Ok(());
                }
                self.check_resolved(domain).await
            }
            Host::Ipv4(ip) => {
                if self.allowed_hosts.contains(&ip.to_string()) {
                    return Ok(());
                }
                reject_private(IpAddr::V4(ip))
            }
            Host::Ipv6(ip) => {
                if self.allowed_hosts.contains(&ip.to_string()) {
                    return Ok(());
                }
                reject_private(IpAddr::V6(ip))
            }
        }
    }

    /// Resolve a hostname and reject private/loopback results.
    async fn check_resolved(&self, domain: &str) -> Result<(), OriginError> {
        let mut addrs = tokio::net::lookup_host((domain, 0)).await.map_err(|e| {
            tracing::debug!(target: "auth.origin", hostname = %domain, error = %e, "Origin hostname did not resolve");
            OriginError::InvalidHostname
        })?;

        // An empty resolution result counts as unresolvable
        let mut resolved_any = false;
        for addr in addrs.by_ref() {
            resolved_any = true;
            reject_private(addr.ip())?;
        }
        if !resolved_any {
            tracing::debug!(target: "auth.origin", hostname = %domain, "Origin hostname resolved to nothing");
            return Err(OriginError::InvalidHostname);
        }

        Ok(())
    }
}

fn reject_private(ip: IpAddr) -> Result<(), OriginError> {
    let private = match ip {
        IpAddr::V4(v4) => v4.is_loopback() || v4.is_private(),
        IpAddr::V6(v6) => v6.is_loopback(),
    };
    if private {
        tracing::debug!(target: "auth.origin", ip = %ip, "Origin resolves to a private address");
        return Err(OriginError::PrivateAddressBlocked);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn guard() -> OriginGuard {
        OriginGuard::new(HashSet::from([
            "trusted.example.com".to_string(),
            "localhost".to_string(),
        ]))
    }

    #[tokio::test]
    async fn test_absent_origin_is_allowed() {
        assert!(guard().validate(None).await.is_ok());
    }

    #[tokio::test]
    async fn test_allow_listed_host_skips_resolution() {
        // trusted.example.com does not resolve anywhere; the allow-list
        // must short-circuit before DNS
        assert!(guard()
            .validate(Some("https://trusted.example.com"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_allow_listed_host_with_port() {
        assert!(guard()
            .validate(Some("https://trusted.example.com:8443"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_loopback_ip_is_blocked() {
        let err = guard()
            .validate(Some("http://127.0.0.1"))
            .await
            .unwrap_err();
        assert_eq!(err, OriginError::PrivateAddressBlocked);
    }

    #[tokio::test]
    async fn test_private_ranges_are_blocked() {
        for origin in [
            "http://10.0.0.5",
            "http://172.16.3.4:9000",
            "http://192.168.1.10",
        ] {
            let err = guard().validate(Some(origin)).await.unwrap_err();
            assert_eq!(err, OriginError::PrivateAddressBlocked, "for {origin}");
        }
    }

    #[tokio::test]
    async fn test_public_ip_is_allowed() {
        assert!(guard().validate(Some("https://93.184.216.34")).await.is_ok());
    }

    #[tokio::test]
    async fn test_allow_listed_ip_short_circuits() {
        let guard = OriginGuard::new(HashSet::from(["127.0.0.1".to_string()]));
        assert!(guard.validate(Some("http://127.0.0.1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_unresolvable_hostname_is_invalid() {
        let err = guard()
            .validate(Some("https://definitely-not-a-real-host.invalid"))
            .await
            .unwrap_err();
        assert_eq!(err, OriginError::InvalidHostname);
    }

    #[tokio::test]
    async fn test_garbage_origin_fails_closed() {
        for origin in ["not a url", "::::", "http://"] {
            let err = guard().validate(Some(origin)).await.unwrap_err();
            assert_eq!(err, OriginError::InvalidOrigin, "for {origin:?}");
        }
    }
}
