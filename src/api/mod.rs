pub mod api_structs;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router
};
use chrono::{DateTime, Utc};
use tower_http::trace::TraceLayer;

use crate::{
    config::RatingConfig,
    database::store::ReferenceStore,
    model::pipeline::RatingProcessor,
    render::Presenter
};

/// Shared state of the HTTP service.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ReferenceStore>,
    pub processor: RatingProcessor,
    pub presenter: Arc<Presenter>,
    pub started_at: DateTime<Utc>
}

impl AppState {
    pub fn new(store: Arc<ReferenceStore>, config: &RatingConfig, presenter: Presenter) -> AppState {
        AppState {
            store,
            processor: RatingProcessor::new(config.limits(), config.mode),
            presenter: Arc::new(presenter),
            started_at: Utc::now()
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/ratings", post(handlers::rate))
        .route("/api/ratings/image", post(handlers::rate_image))
        .route("/api/render", post(handlers::render))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
