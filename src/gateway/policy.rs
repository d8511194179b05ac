use axum::http::Method;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// An `Authorization` header must be present; its absence short-circuits
    /// with 401 before any upstream call.
    Required,

    Anonymous,
}

/// What a route answers when the upstream call fails. The original system
/// chose between these ad hoc per route; here the choice is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// HTTP 200 with `success: false` so decorative content degrades
    /// without surfacing an error state to the visitor.
    GracefulOk,

    /// Republish the upstream's real status; transport failures become 502.
    MirrorStatus,

    /// Any failure collapses to a fixed 500.
    InternalError,
}

/// Per-route configuration for the shared forward mechanism.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    /// Stable label used for logs and metrics.
    pub name: &'static str,

    pub method: Method,

    pub auth: AuthPolicy,

    /// Per-route deadline; `None` falls back to the configured default.
    pub timeout: Option<Duration>,

    pub fallback: FallbackPolicy,

    /// Resource name for 404 mapping on detail routes, e.g. "Post".
    pub not_found: Option<&'static str>,
}

impl RoutePolicy {
    #[must_use]
    pub const fn anonymous(name: &'static str, method: Method) -> Self {
        Self {
            name,
            method,
            auth: AuthPolicy::Anonymous,
            timeout: None,
            fallback: FallbackPolicy::MirrorStatus,
            not_found: None,
        }
    }

    #[must_use]
    pub const fn protected(name: &'static str, method: Method) -> Self {
        Self {
            name,
            method,
            auth: AuthPolicy::Required,
            timeout: None,
            fallback: FallbackPolicy::MirrorStatus,
            not_found: None,
        }
    }

    #[must_use]
    pub const fn graceful(mut self) -> Self {
        self.fallback = FallbackPolicy::GracefulOk;
        self
    }

    #[must_use]
    pub const fn internal_on_failure(mut self) -> Self {
        self.fallback = FallbackPolicy::InternalError;
        self
    }

    #[must_use]
    pub const fn timeout_ms(mut self, ms: u64) -> Self {
        self.timeout = Some(Duration::from_millis(ms));
        self
    }

    #[must_use]
    pub const fn not_found(mut self, resource: &'static str) -> Self {
        self.not_found = Some(resource);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: RoutePolicy = RoutePolicy::anonymous("notices.detail", Method::GET)
        .timeout_ms(8000)
        .not_found("Notice");

    #[test]
    fn builders_compose_in_const_context() {
        assert_eq!(DETAIL.auth, AuthPolicy::Anonymous);
        assert_eq!(DETAIL.timeout, Some(Duration::from_millis(8000)));
        assert_eq!(DETAIL.not_found, Some("Notice"));
        assert_eq!(DETAIL.fallback, FallbackPolicy::MirrorStatus);
    }
}
