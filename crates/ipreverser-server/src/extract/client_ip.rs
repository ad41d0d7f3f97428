//! Client address extractor.

use std::borrow::Cow;
use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap};
use derive_more::{Deref, Display};
use ipreverser_core::{RequestSource, extract_client_ip};

/// Adapts an `axum` header map and socket address to [`RequestSource`].
///
/// Header values are decoded lossily, so a value with invalid bytes is still
/// present and fails reversal later instead of yielding to the next source.
#[derive(Debug)]
pub struct HeaderSource<'a> {
    headers: Vec<(&'a str, Cow<'a, str>)>,
    remote_address: Option<String>,
}

impl<'a> HeaderSource<'a> {
    /// Creates a source over the given headers and optional peer address.
    pub fn new(headers: &'a HeaderMap, remote_address: Option<SocketAddr>) -> Self {
        let headers = headers
            .iter()
            .map(|(name, value)| (name.as_str(), String::from_utf8_lossy(value.as_bytes())))
            .collect();

        Self {
            headers,
            remote_address: remote_address.map(|addr| addr.ip().to_string()),
        }
    }
}

impl RequestSource for HeaderSource<'_> {
    fn header(&self, name: &str) -> Option<&str> {
        // First value wins for repeated headers.
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_ref())
    }

    fn remote_address(&self) -> Option<&str> {
        self.remote_address.as_deref()
    }
}

/// The caller's IP address.
///
/// Resolved with [`extract_client_ip`] from `X-Forwarded-For`, `X-Real-IP`,
/// `X-Client-IP` and the socket address recorded by
/// [`into_make_service_with_connect_info`]. Extraction never fails; without
/// any source the address is `127.0.0.1`.
///
/// ```rust
/// use ipreverser_server::extract::ClientIp;
///
/// async fn handler(ClientIp(ip): ClientIp) -> String {
///     ip
/// }
/// ```
///
/// [`into_make_service_with_connect_info`]: axum::Router::into_make_service_with_connect_info
#[derive(Debug, Clone, PartialEq, Eq, Deref, Display)]
pub struct ClientIp(pub String);

impl ClientIp {
    /// Resolves the client address from request headers and extensions.
    pub fn resolve(headers: &HeaderMap, extensions: &Extensions) -> Self {
        let peer = extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Self(extract_client_ip(&HeaderSource::new(headers, peer)))
    }

    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for ClientIp
where
    S: Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::resolve(&parts.headers, &parts.extensions))
    }
}
