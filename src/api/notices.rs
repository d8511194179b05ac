use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, Method},
    response::Response,
};
use serde_json::Value;
use std::sync::Arc;

use super::AppState;
use crate::gateway::{Inbound, RoutePolicy, shape};
use crate::models::Notice;

const LIST: RoutePolicy = RoutePolicy::anonymous("notices.list", Method::GET);

const DETAIL: RoutePolicy =
    RoutePolicy::anonymous("notices.detail", Method::GET).not_found("Notice");

const CREATE: RoutePolicy = RoutePolicy::protected("notices.create", Method::POST);

const UPDATE: RoutePolicy =
    RoutePolicy::protected("notices.update", Method::PUT).not_found("Notice");

const DELETE: RoutePolicy =
    RoutePolicy::protected("notices.delete", Method::DELETE).not_found("Notice");

/// Category, status and page filters pass through to the upstream
/// unchanged. Reading a detail also bumps its view counter upstream.
pub async fn list_notices(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let inbound = Inbound::from_headers(&headers).with_query(query);
    state
        .gateway
        .forward(&LIST, "/notices", inbound, shape::typed::<Vec<Notice>>)
        .await
}

pub async fn get_notice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let inbound = Inbound::from_headers(&headers);
    state
        .gateway
        .forward(
            &DETAIL,
            format!("/notices/{}", urlencoding::encode(&id)),
            inbound,
            shape::typed::<Notice>,
        )
        .await
}

pub async fn create_notice(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let inbound = Inbound::from_headers(&headers).with_body(body.map(|Json(b)| b));
    state
        .gateway
        .forward(&CREATE, "/notices", inbound, shape::verbatim)
        .await
}

pub async fn update_notice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let inbound = Inbound::from_headers(&headers).with_body(body.map(|Json(b)| b));
    state
        .gateway
        .forward(
            &UPDATE,
            format!("/notices/{}", urlencoding::encode(&id)),
            inbound,
            shape::verbatim,
        )
        .await
}

pub async fn delete_notice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let inbound = Inbound::from_headers(&headers);
    state
        .gateway
        .forward(
            &DELETE,
            format!("/notices/{}", urlencoding::encode(&id)),
            inbound,
            shape::verbatim,
        )
        .await
}
