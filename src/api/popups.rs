use axum::{extract::State, http::Method, response::Response};
use std::sync::Arc;

use super::AppState;
use crate::gateway::{Inbound, RoutePolicy, shape};
use crate::models::Popup;

const LIST: RoutePolicy = RoutePolicy::anonymous("popups.list", Method::GET).graceful();

/// Active modal promos. Decorative content: a dead upstream means no popup,
/// not an error page.
pub async fn list_popups(State(state): State<Arc<AppState>>) -> Response {
    state
        .gateway
        .forward(&LIST, "/popups", Inbound::default(), shape::typed::<Vec<Popup>>)
        .await
}
