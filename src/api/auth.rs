//! Auth passthrough. The gateway never validates credentials or issues
//! tokens itself; the upstream owns the user store and the refresh-token
//! lifecycle. The only local enforcement is header presence on the
//! protected routes.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, Method},
    response::Response,
};
use serde_json::Value;
use std::sync::Arc;

use super::AppState;
use crate::gateway::{Inbound, RoutePolicy, shape};

const LOGIN: RoutePolicy = RoutePolicy::anonymous("auth.login", Method::POST);

const REFRESH: RoutePolicy = RoutePolicy::anonymous("auth.refresh", Method::POST);

const ME: RoutePolicy = RoutePolicy::protected("auth.me", Method::GET);

const LOGOUT: RoutePolicy = RoutePolicy::protected("auth.logout", Method::POST);

pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let inbound = Inbound::from_headers(&headers).with_body(body.map(|Json(b)| b));
    state
        .gateway
        .forward(&LOGIN, "/auth/login", inbound, shape::verbatim)
        .await
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let inbound = Inbound::from_headers(&headers).with_body(body.map(|Json(b)| b));
    state
        .gateway
        .forward(&REFRESH, "/auth/refresh", inbound, shape::verbatim)
        .await
}

pub async fn me(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let inbound = Inbound::from_headers(&headers);
    state
        .gateway
        .forward(&ME, "/auth/me", inbound, shape::verbatim)
        .await
}

pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let inbound = Inbound::from_headers(&headers);
    state
        .gateway
        .forward(&LOGOUT, "/auth/logout", inbound, shape::verbatim)
        .await
}
