use axum::{extract::State, http::Method, response::Response};
use std::sync::Arc;

use super::AppState;
use crate::gateway::{Inbound, RoutePolicy, shape};
use crate::models::Announcement;

const LIST: RoutePolicy = RoutePolicy::anonymous("announcements.list", Method::GET).graceful();

/// Active announcement-bar messages, same degradation contract as the
/// other decorative content routes.
pub async fn list_announcements(State(state): State<Arc<AppState>>) -> Response {
    state
        .gateway
        .forward(
            &LIST,
            "/announcements",
            Inbound::default(),
            shape::typed::<Vec<Announcement>>,
        )
        .await
}
