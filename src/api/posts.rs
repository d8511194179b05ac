//! Discussion-board routes. Listing and reading are anonymous; everything
//! that writes requires an `Authorization` header, which is forwarded to
//! the upstream untouched.

use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, Method},
    response::Response,
};
use serde_json::Value;
use std::sync::Arc;

use super::AppState;
use crate::constants::timeouts::UPSTREAM_MS;
use crate::gateway::{Inbound, RoutePolicy, shape};

const LIST: RoutePolicy =
    RoutePolicy::anonymous("posts.list", Method::GET).timeout_ms(UPSTREAM_MS);

const DETAIL: RoutePolicy = RoutePolicy::anonymous("posts.detail", Method::GET)
    .timeout_ms(UPSTREAM_MS)
    .not_found("Post");

const CREATE: RoutePolicy = RoutePolicy::protected("posts.create", Method::POST);

const UPDATE: RoutePolicy =
    RoutePolicy::protected("posts.update", Method::PUT).not_found("Post");

const DELETE: RoutePolicy =
    RoutePolicy::protected("posts.delete", Method::DELETE).not_found("Post");

const COMMENTS_LIST: RoutePolicy =
    RoutePolicy::anonymous("comments.list", Method::GET).not_found("Post");

const COMMENTS_CREATE: RoutePolicy =
    RoutePolicy::protected("comments.create", Method::POST).not_found("Post");

const COMMENTS_DELETE: RoutePolicy =
    RoutePolicy::protected("comments.delete", Method::DELETE).not_found("Comment");

const COMMENTS_RESTORE: RoutePolicy =
    RoutePolicy::protected("comments.restore", Method::POST).not_found("Comment");

pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let inbound = Inbound::from_headers(&headers).with_query(query);
    state
        .gateway
        .forward(&LIST, "/posts", inbound, shape::unwrap_data)
        .await
}

pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let inbound = Inbound::from_headers(&headers);
    state
        .gateway
        .forward(
            &DETAIL,
            format!("/posts/{}", urlencoding::encode(&id)),
            inbound,
            shape::unwrap_data,
        )
        .await
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let inbound = Inbound::from_headers(&headers).with_body(body.map(|Json(b)| b));
    state
        .gateway
        .forward(&CREATE, "/posts", inbound, shape::unwrap_data)
        .await
}

pub async fn update_post(
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
            format!("/posts/{}", urlencoding::encode(&id)),
            inbound,
            shape::unwrap_data,
        )
        .await
}

pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let inbound = Inbound::from_headers(&headers);
    state
        .gateway
        .forward(
            &DELETE,
            format!("/posts/{}", urlencoding::encode(&id)),
            inbound,
            shape::verbatim,
        )
        .await
}

pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let inbound = Inbound::from_headers(&headers).with_query(query);
    state
        .gateway
        .forward(
            &COMMENTS_LIST,
            format!("/posts/{}/comments", urlencoding::encode(&id)),
            inbound,
            shape::unwrap_data,
        )
        .await
}

pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let inbound = Inbound::from_headers(&headers).with_body(body.map(|Json(b)| b));
    state
        .gateway
        .forward(
            &COMMENTS_CREATE,
            format!("/posts/{}/comments", urlencoding::encode(&id)),
            inbound,
            shape::unwrap_data,
        )
        .await
}

pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let inbound = Inbound::from_headers(&headers);
    state
        .gateway
        .forward(
            &COMMENTS_DELETE,
            format!("/comments/{}", urlencoding::encode(&id)),
            inbound,
            shape::verbatim,
        )
        .await
}

/// Undoes a soft delete. The upstream keeps removed comments flagged rather
/// than dropped, so moderators can bring one back.
pub async fn restore_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let inbound = Inbound::from_headers(&headers);
    state
        .gateway
        .forward(
            &COMMENTS_RESTORE,
            format!("/comments/{}/restore", urlencoding::encode(&id)),
            inbound,
            shape::unwrap_data,
        )
        .await
}
