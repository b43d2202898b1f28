//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{info, warn};

use crate::state::{AppState, ControlError, TimerPreset};
use super::responses::{
    ApiResponse, HealthResponse, PercentRequest, SoundRequest, StatusResponse, ThemeRequest,
    TimerRequest,
};

fn rejected(action: &str, e: ControlError) -> StatusCode {
    warn!("Rejected {} request: {}", action, e);
    StatusCode::BAD_REQUEST
}

/// Handle POST /playback/toggle - Start or stop playback
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let session = state.controller.toggle_playback().await;
    state.record_action("toggle");
    info!("Toggle endpoint called - playing={}", session.is_playing);

    let message = if session.is_playing { "Playback started" } else { "Playback stopped" };
    Json(ApiResponse::new(message, session))
}

/// Handle POST /sound - Switch track, optionally starting it
pub async fn sound_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SoundRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let session = state
        .controller
        .set_sound(&request.file, request.autoplay)
        .await
        .map_err(|e| rejected("sound", e))?;
    state.record_action("sound");

    Ok(Json(ApiResponse::new(format!("Sound set to {}", session.sound), session)))
}

/// Handle POST /volume - Set volume from a percentage
pub async fn volume_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PercentRequest>,
) -> Json<ApiResponse> {
    let session = state.controller.set_volume(request.percent);
    state.record_action("volume");

    Json(ApiResponse::new(format!("Volume set to {:.2}", session.volume), session))
}

/// Handle POST /brightness - Set brightness from a percentage
pub async fn brightness_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PercentRequest>,
) -> Json<ApiResponse> {
    let session = state.controller.set_brightness(request.percent);
    state.record_action("brightness");

    Json(ApiResponse::new(format!("Brightness set to {}", session.brightness), session))
}

/// Handle POST /timer - Select a sleep timer preset
pub async fn timer_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TimerRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let preset = TimerPreset::from_json(&request.minutes)
        .ok_or_else(|| rejected("timer", ControlError::InvalidTimer(request.minutes.to_string())))?;
    let session = state.controller.set_timer_preset(preset);
    state.record_action("timer");

    Ok(Json(ApiResponse::new(
        format!("Sleep timer set to {}", session.timer_label),
        session,
    )))
}

/// Handle POST /timer/cycle - Advance to the next timer preset
pub async fn timer_cycle_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let session = state.controller.cycle_timer_preset();
    state.record_action("timer-cycle");

    Json(ApiResponse::new(
        format!("Sleep timer set to {}", session.timer_label),
        session,
    ))
}

/// Handle POST /theme - Select a visual theme
pub async fn theme_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ThemeRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let session = state
        .controller
        .set_theme(&request.theme)
        .map_err(|e| rejected("theme", e))?;
    state.record_action("theme");

    Ok(Json(ApiResponse::new(format!("Theme set to {}", session.theme), session)))
}

/// Handle GET /status - Return current session status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        session: state.controller.status(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
