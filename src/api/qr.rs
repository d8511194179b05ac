//! QR short-code routes. Resolution is the one route on the whole surface
//! that answers with a redirect instead of JSON; the admin routes are
//! ordinary protected proxies.

use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, header},
    response::Response,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::{AppState, GatewayError};
use crate::constants::timeouts::UPSTREAM_MS;
use crate::gateway::{Inbound, RoutePolicy, shape};
use crate::models::{QrCode, ScanResolution, qr::is_valid_code};

const LIST: RoutePolicy = RoutePolicy::protected("qr.list", Method::GET);

const CREATE: RoutePolicy = RoutePolicy::protected("qr.create", Method::POST);

const DELETE: RoutePolicy =
    RoutePolicy::protected("qr.delete", Method::DELETE).not_found("QR code");

/// `GET /qr/{code}` — look the code up upstream (which also counts the
/// scan) and bounce the visitor to the resolved target. No target means
/// 404 JSON, never a redirect to nowhere.
pub async fn resolve_code(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Response, GatewayError> {
    if !is_valid_code(&code) {
        return Err(GatewayError::bad_request("Invalid QR code"));
    }

    let reply = state
        .gateway
        .fetch(
            format!("/qr/{code}/scan"),
            None,
            Some(Duration::from_millis(UPSTREAM_MS)),
        )
        .await?;

    if reply.status == StatusCode::NOT_FOUND {
        return Err(GatewayError::not_found("QR code"));
    }
    if !reply.status.is_success() {
        return Err(GatewayError::UpstreamUnavailable(format!(
            "scan lookup returned {}",
            reply.status
        )));
    }

    let target = reply
        .body
        .get("data")
        .cloned()
        .and_then(|data| serde_json::from_value::<ScanResolution>(data).ok())
        .and_then(|resolution| resolution.target_url)
        .filter(|url| !url.is_empty());

    match target {
        Some(url) => {
            let location = header::HeaderValue::from_str(&url)
                .map_err(|_| GatewayError::internal("Upstream returned an unusable target URL"))?;

            Response::builder()
                .status(StatusCode::FOUND)
                .header(header::LOCATION, location)
                .body(Body::empty())
                .map_err(|e| GatewayError::internal(e.to_string()))
        }
        None => Err(GatewayError::not_found("QR code")),
    }
}

pub async fn list_codes(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let inbound = Inbound::from_headers(&headers);
    state
        .gateway
        .forward(&LIST, "/qr", inbound, shape::typed::<Vec<QrCode>>)
        .await
}

pub async fn create_code(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let inbound = Inbound::from_headers(&headers).with_body(body.map(|Json(b)| b));
    state
        .gateway
        .forward(&CREATE, "/qr", inbound, shape::verbatim)
        .await
}

pub async fn delete_code(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let inbound = Inbound::from_headers(&headers);
    state
        .gateway
        .forward(
            &DELETE,
            format!("/qr/{}", urlencoding::encode(&id)),
            inbound,
            shape::verbatim,
        )
        .await
}
