//! The one mechanism every proxied route is an instance of.
//!
//! A route hands [`Gateway::forward`] its [`RoutePolicy`], the upstream path
//! and the relevant pieces of the inbound request. The gateway enforces the
//! auth requirement locally, forwards the call with the route's deadline,
//! and republishes the upstream envelope through the route's shaper — or
//! the route's declared fallback when the upstream fails. Each call is one
//! stateless request/response cycle: no retries, no local persistence.

pub mod policy;
pub mod shape;

pub use policy::{AuthPolicy, FallbackPolicy, RoutePolicy};
pub use shape::ShapeError;

use axum::Json;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::api::types::ApiResponse;
use crate::clients::upstream::{UpstreamError, UpstreamReply, UpstreamRequest, UpstreamTransport};

/// The pieces of an inbound front-end request the upstream gets to see.
#[derive(Debug, Default)]
pub struct Inbound {
    pub authorization: Option<String>,

    /// Raw query string, forwarded verbatim.
    pub query: Option<String>,

    pub body: Option<Value>,
}

impl Inbound {
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            authorization: authorization_header(headers),
            query: None,
            body: None,
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: Option<String>) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }
}

/// `Authorization` is forwarded byte for byte; the gateway never inspects
/// the scheme or the credential.
#[must_use]
pub fn authorization_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}

pub struct Gateway {
    transport: Arc<dyn UpstreamTransport>,

    default_timeout: Duration,
}

impl Gateway {
    #[must_use]
    pub fn new(transport: Arc<dyn UpstreamTransport>, default_timeout: Duration) -> Self {
        Self {
            transport,
            default_timeout,
        }
    }

    #[must_use]
    pub fn transport(&self) -> &Arc<dyn UpstreamTransport> {
        &self.transport
    }

    /// Forward one inbound request according to the route's policy and
    /// republish the result. Always produces a response; failures are
    /// rendered through the route's fallback.
    pub async fn forward<F>(
        &self,
        route: &RoutePolicy,
        path: impl Into<String>,
        inbound: Inbound,
        shaper: F,
    ) -> Response
    where
        F: FnOnce(Value) -> Result<Value, ShapeError>,
    {
        if route.auth == AuthPolicy::Required && inbound.authorization.is_none() {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<()>::error("Authentication required")),
            )
                .into_response();
        }

        let request = UpstreamRequest {
            method: route.method.clone(),
            path: path.into(),
            query: inbound.query,
            authorization: inbound.authorization,
            body: inbound.body,
            timeout: route.timeout.unwrap_or(self.default_timeout),
        };

        match self.transport.send(request).await {
            Ok(reply) if reply.status.is_success() => match shaper(reply.body) {
                Ok(shaped) => (reply.status, Json(shaped)).into_response(),
                Err(err) => {
                    warn!(route = route.name, error = %err, "Upstream body failed reshaping");
                    self.fallback_response(route, None)
                }
            },
            Ok(reply) if reply.status == StatusCode::NOT_FOUND && route.not_found.is_some() => {
                missing_resource(route)
            }
            Ok(reply) => {
                warn!(route = route.name, status = %reply.status, "Upstream reported failure");
                self.fallback_response(route, Some(reply))
            }
            Err(err) => {
                warn!(route = route.name, error = %err, "Upstream call failed");
                self.fallback_response(route, None)
            }
        }
    }

    /// One raw GET against the upstream, outside the policy machinery. Used
    /// where a route composes several upstream calls itself.
    pub async fn fetch(
        &self,
        path: impl Into<String>,
        authorization: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<UpstreamReply, UpstreamError> {
        let mut request = UpstreamRequest::get(path);
        request.authorization = authorization;
        request.timeout = timeout.unwrap_or(self.default_timeout);
        self.transport.send(request).await
    }

    fn fallback_response(&self, route: &RoutePolicy, reply: Option<UpstreamReply>) -> Response {
        match route.fallback {
            FallbackPolicy::GracefulOk => (
                StatusCode::OK,
                Json(ApiResponse::<()>::error("Service temporarily unavailable")),
            )
                .into_response(),
            FallbackPolicy::MirrorStatus => match reply {
                Some(reply) => (reply.status, Json(reply.body)).into_response(),
                None => (
                    StatusCode::BAD_GATEWAY,
                    Json(ApiResponse::<()>::error("Upstream service is unavailable")),
                )
                    .into_response(),
            },
            FallbackPolicy::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Internal server error")),
            )
                .into_response(),
        }
    }
}

fn missing_resource(route: &RoutePolicy) -> Response {
    let resource = route.not_found.unwrap_or("Resource");
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error(format!("{resource} not found"))),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::Method;
    use http_body_util::BodyExt;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedTransport {
        calls: AtomicUsize,
        reply: Result<(u16, Value), &'static str>,
    }

    impl ScriptedTransport {
        fn ok(status: u16, body: Value) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                reply: Ok((status, body)),
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                reply: Err("connection refused"),
            }
        }
    }

    #[async_trait]
    impl UpstreamTransport for ScriptedTransport {
        async fn send(&self, _request: UpstreamRequest) -> Result<UpstreamReply, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok((status, body)) => Ok(UpstreamReply {
                    status: StatusCode::from_u16(*status).unwrap(),
                    body: body.clone(),
                }),
                Err(message) => Err(UpstreamError::Transport((*message).to_string())),
            }
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn gateway(transport: ScriptedTransport) -> (Gateway, Arc<ScriptedTransport>) {
        let transport = Arc::new(transport);
        (
            Gateway::new(transport.clone(), Duration::from_millis(8000)),
            transport,
        )
    }

    #[tokio::test]
    async fn missing_auth_short_circuits_without_upstream_call() {
        let (gateway, transport) = gateway(ScriptedTransport::ok(200, json!({"success": true})));
        let route = RoutePolicy::protected("posts.create", Method::POST);

        let response = gateway
            .forward(&route, "/posts", Inbound::default(), shape::verbatim)
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn graceful_routes_degrade_to_soft_200() {
        let (gateway, _) = gateway(ScriptedTransport::failing());
        let route = RoutePolicy::anonymous("popups.list", Method::GET).graceful();

        let response = gateway
            .forward(&route, "/popups", Inbound::default(), shape::verbatim)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn mirror_routes_republish_upstream_failures() {
        let (gateway, _) = gateway(ScriptedTransport::ok(
            409,
            json!({"success": false, "error": "Duplicate post"}),
        ));
        let route = RoutePolicy::anonymous("posts.create", Method::POST);

        let response = gateway
            .forward(&route, "/posts", Inbound::default(), shape::verbatim)
            .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Duplicate post");
    }

    #[tokio::test]
    async fn not_found_mapping_names_the_resource() {
        let (gateway, _) = gateway(ScriptedTransport::ok(404, json!({"success": false})));
        let route = RoutePolicy::anonymous("posts.detail", Method::GET).not_found("Post");

        let response = gateway
            .forward(&route, "/posts/nope", Inbound::default(), shape::verbatim)
            .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Post not found");
    }
}
