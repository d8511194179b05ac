use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::warn;

use super::AppState;
use crate::clients::upstream::UpstreamReply;
use crate::gateway::{Inbound, RoutePolicy, shape};
use crate::models::{Banner, BannerSettings};

const CREATE: RoutePolicy = RoutePolicy::protected("banners.create", Method::POST);

const REORDER: RoutePolicy = RoutePolicy::protected("banners.reorder", Method::PUT);

const SETTINGS: RoutePolicy = RoutePolicy::protected("banners.settings", Method::PUT);

const DELETE: RoutePolicy =
    RoutePolicy::protected("banners.delete", Method::DELETE).not_found("Banner");

/// The carousel needs the slides and their playback settings together, so
/// this route joins two upstream calls instead of going through the plain
/// forward path. Failure degrades to an empty carousel with default
/// settings rather than an error page.
pub async fn list_banners(State(state): State<Arc<AppState>>) -> Response {
    let gateway = &state.gateway;

    let (banners_reply, settings_reply) = futures::future::join(
        gateway.fetch("/banners", None, None),
        gateway.fetch("/banners/settings", None, None),
    )
    .await;

    let settings = settings_reply
        .ok()
        .and_then(|reply| parse_data::<BannerSettings>(&reply))
        .unwrap_or_default();

    match banners_reply {
        Ok(reply) => {
            if let Some(mut banners) = parse_data::<Vec<Banner>>(&reply) {
                banners.sort_by_key(|banner| banner.order);
                return (
                    StatusCode::OK,
                    Json(json!({
                        "success": true,
                        "banners": banners,
                        "settings": settings,
                    })),
                )
                    .into_response();
            }
            warn!(status = %reply.status, "Banner listing failed upstream");
        }
        Err(err) => warn!(error = %err, "Banner listing call failed"),
    }

    (
        StatusCode::OK,
        Json(json!({
            "success": false,
            "banners": [],
            "settings": BannerSettings::default(),
        })),
    )
        .into_response()
}

fn parse_data<T: serde::de::DeserializeOwned>(reply: &UpstreamReply) -> Option<T> {
    if !reply.status.is_success() {
        return None;
    }
    reply
        .body
        .get("data")
        .cloned()
        .and_then(|data| serde_json::from_value(data).ok())
}

pub async fn create_banner(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let inbound = Inbound::from_headers(&headers).with_body(body.map(|Json(b)| b));
    state
        .gateway
        .forward(&CREATE, "/banners", inbound, shape::verbatim)
        .await
}

pub async fn reorder_banners(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let inbound = Inbound::from_headers(&headers).with_body(body.map(|Json(b)| b));
    state
        .gateway
        .forward(&REORDER, "/banners/reorder", inbound, shape::verbatim)
        .await
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let inbound = Inbound::from_headers(&headers).with_body(body.map(|Json(b)| b));
    state
        .gateway
        .forward(&SETTINGS, "/banners/settings", inbound, shape::verbatim)
        .await
}

pub async fn delete_banner(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let inbound = Inbound::from_headers(&headers);
    state
        .gateway
        .forward(
            &DELETE,
            format!("/banners/{}", urlencoding::encode(&id)),
            inbound,
            shape::verbatim,
        )
        .await
}
