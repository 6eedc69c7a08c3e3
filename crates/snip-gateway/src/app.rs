use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    analytics_handler, health_handler, list_urls_handler, redirect_handler, shorten_handler,
};
use crate::rate_limit::{rate_limit, IpRateLimiter};
use crate::state::AppState;

pub struct App {}

impl App {
    /// Builds the HTTP router.
    ///
    /// Every route except `/health` goes through the per-client rate limiter.
    pub fn router(state: AppState, limiter: Arc<IpRateLimiter>) -> Router {
        Router::new()
            .route("/shorten", post(shorten_handler))
            .route("/urls", get(list_urls_handler))
            .route("/analytics/{code}", get(analytics_handler))
            .route("/{code}", get(redirect_handler))
            .layer(middleware::from_fn_with_state(limiter, rate_limit))
            .route("/health", get(health_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
