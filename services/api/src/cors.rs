//! Cross-origin policy
//!
//! An origin is accepted when it is in the configured list or when its host
//! is a subdomain of the trusted suffix. Requests without an `Origin` header
//! (curl, the CLI, server to server) are not subject to the policy.

use axum::http::{HeaderValue, Method, header, request::Parts};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use url::Url;

use crate::config::ServerConfig;

/// Which browser origins may call the API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginPolicy {
    exact: Vec<String>,
    trusted_suffix: Option<String>,
}

impl OriginPolicy {
    pub fn new(exact: Vec<String>, trusted_suffix: &str) -> Self {
        let trusted_suffix = trusted_suffix.trim();
        let trusted_suffix = (!trusted_suffix.is_empty()).then(|| {
            if trusted_suffix.starts_with('.') {
                trusted_suffix.to_ascii_lowercase()
            } else {
                format!(".{}", trusted_suffix.to_ascii_lowercase())
            }
        });

        Self {
            exact,
            trusted_suffix,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.allowed_origins(), &config.cors_trusted_suffix)
    }

    /// Whether a browser at `origin` may call the API
    pub fn allows(&self, origin: &str) -> bool {
        let origin = origin.trim_end_matches('/');
        if self.exact.iter().any(|allowed| allowed == origin) {
            return true;
        }

        let Some(suffix) = self.trusted_suffix.as_deref() else {
            return false;
        };
        let Ok(url) = Url::parse(origin) else {
            return false;
        };

        matches!(url.scheme(), "http" | "https")
            && url
                .host_str()
                .is_some_and(|host| host.to_ascii_lowercase().ends_with(suffix))
    }
}

/// `tower-http` layer answering preflights and decorating allowed responses
pub fn cors_layer(policy: Arc<OriginPolicy>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .map(|origin| policy.allows(origin))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
