use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, Method},
    response::Response,
};
use std::sync::Arc;

use super::AppState;
use crate::gateway::{Inbound, RoutePolicy, shape};
use crate::models::Personnel;

const LIST: RoutePolicy = RoutePolicy::anonymous("personnel.list", Method::GET);

const DETAIL: RoutePolicy =
    RoutePolicy::anonymous("personnel.detail", Method::GET).not_found("Personnel post");

pub async fn list_personnel(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let inbound = Inbound::from_headers(&headers).with_query(query);
    state
        .gateway
        .forward(&LIST, "/personnel", inbound, shape::typed::<Vec<Personnel>>)
        .await
}

pub async fn get_personnel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let inbound = Inbound::from_headers(&headers);
    state
        .gateway
        .forward(
            &DETAIL,
            format!("/personnel/{}", urlencoding::encode(&id)),
            inbound,
            shape::typed::<Personnel>,
        )
        .await
}
