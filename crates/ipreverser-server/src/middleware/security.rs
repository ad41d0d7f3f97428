//! Security middleware for HTTP request protection.
//!
//! CORS, a fixed set of response security headers, request body size limits
//! and response compression.

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::http::header::{self, HeaderName, HeaderValue};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;

/// Tracing target for security configuration.
const TRACING_TARGET: &str = "ipreverser_server::middleware::security";

/// Maximum accepted request body size in bytes.
pub const DEFAULT_MAX_BODY_SIZE: usize = 100 * 1024;

/// Headers set on every response regardless of configuration.
const STATIC_HEADERS: [(&str, &str); 10] = [
    ("x-frame-options", "SAMEORIGIN"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "no-referrer"),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

/// Extension trait for `axum::`[`Router`] to apply security middleware.
pub trait RouterSecurityExt<S> {
    /// Layers security middlewares with the provided configurations.
    fn with_security(self, cors: &CorsConfig, headers: &SecurityHeadersConfig) -> Self;
}

impl<S> RouterSecurityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_security(self, cors: &CorsConfig, headers: &SecurityHeadersConfig) -> Self {
        let mut router = self
            .layer(DefaultBodyLimit::max(DEFAULT_MAX_BODY_SIZE))
            .layer(RequestBodyLimitLayer::new(DEFAULT_MAX_BODY_SIZE))
            .layer(CompressionLayer::new())
            .layer(cors.to_layer());

        for (name, value) in STATIC_HEADERS {
            router = router.layer(SetResponseHeaderLayer::overriding(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            ));
        }

        match HeaderValue::from_str(&headers.hsts_header_value()) {
            Ok(value) => {
                router = router.layer(SetResponseHeaderLayer::overriding(
                    header::STRICT_TRANSPORT_SECURITY,
                    value,
                ));
            }
            Err(error) => tracing::warn!(
                target: TRACING_TARGET,
                %error,
                "Skipping invalid Strict-Transport-Security value"
            ),
        }

        if let Some(csp) = headers.content_security_policy.as_deref() {
            match HeaderValue::from_str(csp) {
                Ok(value) => {
                    router = router.layer(SetResponseHeaderLayer::overriding(
                        header::CONTENT_SECURITY_POLICY,
                        value,
                    ));
                }
                Err(error) => tracing::warn!(
                    target: TRACING_TARGET,
                    %error,
                    "Skipping invalid Content-Security-Policy value"
                ),
            }
        }

        router
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
///
/// With no configured origins every origin is allowed. Credentials are never
/// allowed, so a wildcard origin stays valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct CorsConfig {
    /// List of allowed CORS origins; any origin when empty.
    #[cfg_attr(
        feature = "config",
        arg(long = "cors-origins", env = "CORS_ORIGINS", value_delimiter = ',')
    )]
    pub allowed_origins: Vec<String>,

    /// Maximum age for CORS preflight requests in seconds.
    #[cfg_attr(
        feature = "config",
        arg(long = "cors-max-age", env = "CORS_MAX_AGE")
    )]
    pub max_age_seconds: Option<u64>,
}

impl CorsConfig {
    /// Restricts cross-origin access to the given origins.
    pub fn with_origins<I, T>(origins: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            allowed_origins: origins.into_iter().map(Into::into).collect(),
            max_age_seconds: None,
        }
    }

    /// Returns the CORS max age as a Duration.
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age_seconds.map(Duration::from_secs)
    }

    /// Returns the origin policy; unparsable origins are skipped.
    pub fn allow_origin(&self) -> AllowOrigin {
        if self.allowed_origins.is_empty() {
            return AllowOrigin::any();
        }

        let origins = self.allowed_origins.iter().filter_map(|origin| {
            let value = origin.trim().parse::<HeaderValue>();
            if value.is_err() {
                tracing::warn!(target: TRACING_TARGET, %origin, "Ignoring invalid CORS origin");
            }
            value.ok()
        });

        AllowOrigin::list(origins)
    }

    /// Builds the CORS layer.
    pub fn to_layer(&self) -> CorsLayer {
        let layer = CorsLayer::new()
            .allow_origin(self.allow_origin())
            .allow_methods([
                Method::GET,
                Method::HEAD,
                Method::PUT,
                Method::PATCH,
                Method::POST,
                Method::DELETE,
            ])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

        match self.max_age() {
            Some(max_age) => layer.max_age(max_age),
            None => layer,
        }
    }
}

/// Security headers configuration for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct SecurityHeadersConfig {
    /// HSTS max age in seconds.
    pub hsts_max_age_seconds: u64,

    /// Whether to include subdomains in HSTS policy.
    pub hsts_include_subdomains: bool,

    /// Content Security Policy directives; omitted when `None`.
    pub content_security_policy: Option<String>,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            hsts_max_age_seconds: 15_552_000,
            hsts_include_subdomains: true,
            content_security_policy: Some(
                "default-src 'self'; \
                 base-uri 'self'; \
                 font-src 'self' https: data:; \
                 form-action 'self'; \
                 frame-ancestors 'self'; \
                 img-src 'self' data:; \
                 object-src 'none'; \
                 script-src 'self'; \
                 script-src-attr 'none'; \
                 style-src 'self' https: 'unsafe-inline'; \
                 upgrade-insecure-requests"
                    .to_owned(),
            ),
        }
    }
}

impl SecurityHeadersConfig {
    /// Returns the HSTS header value as a string.
    pub fn hsts_header_value(&self) -> String {
        if self.hsts_include_subdomains {
            format!("max-age={}; includeSubDomains", self.hsts_max_age_seconds)
        } else {
            format!("max-age={}", self.hsts_max_age_seconds)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;

    fn create_test_server(cors: &CorsConfig) -> anyhow::Result<TestServer> {
        let router: Router = Router::new()
            .route("/", get(|| async { "ok" }))
            .with_security(cors, &SecurityHeadersConfig::default());
        Ok(TestServer::new(router)?)
    }

    #[tokio::test]
    async fn sets_security_headers() -> anyhow::Result<()> {
        let server = create_test_server(&CorsConfig::default())?;

        let response = server.get("/").await;
        response.assert_status_ok();
        assert_eq!(response.header("x-content-type-options"), "nosniff");
        assert_eq!(response.header("x-frame-options"), "SAMEORIGIN");
        assert_eq!(response.header("referrer-policy"), "no-referrer");
        assert_eq!(
            response.header("strict-transport-security"),
            "max-age=15552000; includeSubDomains"
        );
        assert_eq!(response.header("x-dns-prefetch-control"), "off");
        let csp = response.header("content-security-policy");
        assert!(csp.to_str()?.starts_with("default-src 'self'"));
        Ok(())
    }

    #[tokio::test]
    async fn any_origin_without_configuration() -> anyhow::Result<()> {
        let server = create_test_server(&CorsConfig::default())?;

        let response = server
            .get("/")
            .add_header("origin", "https://elsewhere.example")
            .await;
        assert_eq!(response.header("access-control-allow-origin"), "*");
        Ok(())
    }

    #[tokio::test]
    async fn configured_origins_are_enforced() -> anyhow::Result<()> {
        let server = create_test_server(&CorsConfig::with_origins(["https://app.example"]))?;

        let allowed = server
            .get("/")
            .add_header("origin", "https://app.example")
            .await;
        assert_eq!(
            allowed.header("access-control-allow-origin"),
            "https://app.example"
        );

        let denied = server
            .get("/")
            .add_header("origin", "https://elsewhere.example")
            .await;
        assert!(!denied.headers().contains_key("access-control-allow-origin"));
        Ok(())
    }

    #[test]
    fn hsts_without_subdomains() {
        let config = SecurityHeadersConfig {
            hsts_include_subdomains: false,
            ..SecurityHeadersConfig::default()
        };
        assert_eq!(config.hsts_header_value(), "max-age=15552000");
    }
}
