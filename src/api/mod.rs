use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::clients::upstream::UpstreamTransport;
use crate::config::Config;
use crate::gateway::Gateway;

mod announcements;
pub mod auth;
mod banners;
mod error;
mod notices;
mod observability;
mod personnel;
mod popups;
mod posts;
mod qr;
mod system;
pub mod types;

pub use error::GatewayError;
pub use types::ApiResponse;

use metrics_exporter_prometheus::PrometheusHandle;

pub struct AppState {
    pub config: Config,

    pub gateway: Gateway,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

#[must_use]
pub fn create_app_state(
    config: Config,
    transport: Arc<dyn UpstreamTransport>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let gateway = Gateway::new(transport, Duration::from_millis(config.upstream.timeout_ms));

    Arc::new(AppState {
        config,
        gateway,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .route("/announcements", get(announcements::list_announcements))
        .route("/banners", get(banners::list_banners))
        .route("/banners", post(banners::create_banner))
        .route("/banners/reorder", put(banners::reorder_banners))
        .route("/banners/settings", put(banners::update_settings))
        .route("/banners/{id}", delete(banners::delete_banner))
        .route("/popups", get(popups::list_popups))
        .route("/notices", get(notices::list_notices))
        .route("/notices", post(notices::create_notice))
        .route("/notices/{id}", get(notices::get_notice))
        .route("/notices/{id}", put(notices::update_notice))
        .route("/notices/{id}", delete(notices::delete_notice))
        .route("/personnel", get(personnel::list_personnel))
        .route("/personnel/{id}", get(personnel::get_personnel))
        .route("/posts", get(posts::list_posts))
        .route("/posts", post(posts::create_post))
        .route("/posts/{id}", get(posts::get_post))
        .route("/posts/{id}", put(posts::update_post))
        .route("/posts/{id}", delete(posts::delete_post))
        .route("/posts/{id}/comments", get(posts::list_comments))
        .route("/posts/{id}/comments", post(posts::create_comment))
        .route("/comments/{id}", delete(posts::delete_comment))
        .route("/comments/{id}/restore", post(posts::restore_comment))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/me", get(auth::me))
        .route("/auth/logout", post(auth::logout))
        .route("/qr", get(qr::list_codes))
        .route("/qr", post(qr::create_code))
        .route("/qr/{id}", delete(qr::delete_code))
        .route("/system/health/live", get(system::health_live))
        .route("/system/health/ready", get(system::health_ready))
        .with_state(state.clone());

    let root_router = Router::new()
        .route("/qr/{code}", get(qr::resolve_code))
        .route("/metrics", get(observability::get_metrics))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .merge(root_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::track_requests))
}
