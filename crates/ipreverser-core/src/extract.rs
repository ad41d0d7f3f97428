//! Client IP extraction from forwarding headers and the transport address.
//!
//! [`extract_client_ip`] inspects a [`RequestSource`] and resolves a single
//! address string using a fixed precedence:
//!
//! 1. `X-Forwarded-For`, first comma-separated entry, trimmed
//! 2. `X-Real-IP`
//! 3. `X-Client-IP`
//! 4. the remote address of the connection
//! 5. [`FALLBACK_IP`]
//!
//! The first *present* source wins. A present header whose value resolves to
//! an empty string is not skipped in favour of the next source; the result
//! falls back to [`FALLBACK_IP`] instead. An IPv4-mapped IPv6 prefix
//! (`::ffff:`) is stripped from the result. No validation is performed.

use std::collections::HashMap;

use crate::TRACING_TARGET_EXTRACT;

/// Header carrying the proxy chain, client first.
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Header set by reverse proxies such as nginx.
pub const X_REAL_IP: &str = "x-real-ip";

/// Header set by some load balancers.
pub const X_CLIENT_IP: &str = "x-client-ip";

/// Address returned when no source yields a value.
pub const FALLBACK_IP: &str = "127.0.0.1";

/// Prefix of an IPv4-mapped IPv6 address.
pub const IPV4_MAPPED_PREFIX: &str = "::ffff:";

/// Read-only view of the request data the extractor needs.
///
/// Header lookups are case-insensitive; implementations receive lowercase
/// names. Empty header values are treated as absent.
pub trait RequestSource {
    /// Returns the value of the named header, if present.
    fn header(&self, name: &str) -> Option<&str>;

    /// Returns the transport-level remote address, if known.
    fn remote_address(&self) -> Option<&str>;
}

/// Plain [`RequestSource`] backed by owned values.
///
/// Used when request data is not held by an HTTP framework type, and in tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    headers: HashMap<String, String>,
    remote_address: Option<String>,
}

impl RequestInfo {
    /// Creates an empty request description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header, normalizing its name to lowercase.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Sets the transport-level remote address.
    pub fn with_remote_address(mut self, address: impl Into<String>) -> Self {
        self.remote_address = Some(address.into());
        self
    }
}

impl RequestSource for RequestInfo {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn remote_address(&self) -> Option<&str> {
        self.remote_address.as_deref()
    }
}

/// Resolves the client IP for a request.
///
/// Never fails; see the [module documentation](self) for the precedence rules.
pub fn extract_client_ip(source: &impl RequestSource) -> String {
    fn present(value: Option<&str>) -> Option<&str> {
        value.filter(|v| !v.is_empty())
    }

    let (origin, candidate) = if let Some(forwarded) = present(source.header(X_FORWARDED_FOR)) {
        let first = forwarded.split(',').next().unwrap_or_default();
        (X_FORWARDED_FOR, first.trim())
    } else if let Some(real_ip) = present(source.header(X_REAL_IP)) {
        (X_REAL_IP, real_ip)
    } else if let Some(client_ip) = present(source.header(X_CLIENT_IP)) {
        (X_CLIENT_IP, client_ip)
    } else if let Some(remote) = present(source.remote_address()) {
        ("remote_address", remote)
    } else {
        ("fallback", FALLBACK_IP)
    };

    let ip = candidate.replacen(IPV4_MAPPED_PREFIX, "", 1);
    let ip = if ip.is_empty() {
        FALLBACK_IP.to_owned()
    } else {
        ip
    };

    tracing::trace!(
        target: TRACING_TARGET_EXTRACT,
        origin,
        client_ip = %ip,
        "Resolved client address"
    );

    ip
}
