//! HTTP API module
//! 
//! This module contains the control endpoints a display layer drives the
//! session controller through, and the response structures they return.

pub mod handlers;
pub mod responses;
pub mod events;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use events::events_handler;
use handlers::{
    brightness_handler, health_handler, sound_handler, status_handler, theme_handler,
    timer_cycle_handler, timer_handler, toggle_handler, volume_handler,
};

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/playback/toggle", post(toggle_handler))
        .route("/sound", post(sound_handler))
        .route("/volume", post(volume_handler))
        .route("/brightness", post(brightness_handler))
        .route("/timer", post(timer_handler))
        .route("/timer/cycle", post(timer_cycle_handler))
        .route("/theme", post(theme_handler))
        .route("/status", get(status_handler))
        .route("/events", get(events_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
