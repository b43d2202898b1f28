use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use nightlight::{
    api::create_router,
    playback::SilentPlayer,
    state::{AppState, SessionController},
    storage::MemoryStore,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let controller = SessionController::new(
        Arc::new(SilentPlayer::new()),
        Arc::new(MemoryStore::new()),
    );
    create_router(Arc::new(AppState::new(controller, 20554, "127.0.0.1".to_string())))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            request = request.header("content-type", "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn brightness_endpoint_returns_dim_factor() {
    let app = app();

    let (status, body) = send(&app, "POST", "/brightness", Some(json!({ "percent": 0 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["brightness"], 0);
    assert_eq!(body["session"]["dim_factor"], 0.8);

    let (_, body) = send(&app, "POST", "/brightness", Some(json!({ "percent": 400 }))).await;
    assert_eq!(body["session"]["brightness"], 100);
    assert_eq!(body["session"]["dim_factor"], 0.0);
}

#[tokio::test(start_paused = true)]
async fn timer_and_toggle_drive_the_countdown() {
    let app = app();

    let (status, _) = send(&app, "POST", "/timer", Some(json!({ "minutes": 7 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/timer", Some(json!({}))).await;
    assert!(status.is_client_error());

    let (status, body) = send(&app, "POST", "/timer", Some(json!({ "minutes": 30 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["timer_minutes"], 30);
    assert_eq!(body["session"]["remaining_display"], Value::Null);

    let (status, body) = send(&app, "POST", "/playback/toggle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "playing");
    assert_eq!(body["session"]["remaining_display"], "30:00");
    assert_eq!(body["session"]["timer"]["remaining_seconds"], 1800);

    let (_, body) = send(&app, "POST", "/timer", Some(json!({ "minutes": null }))).await;
    assert_eq!(body["session"]["timer_minutes"], Value::Null);
    assert_eq!(body["session"]["timer_label"], "∞");
    assert_eq!(body["session"]["is_playing"], true);
    assert_eq!(body["session"]["timer"]["active"], false);

    let (_, body) = send(&app, "POST", "/timer/cycle", None).await;
    assert_eq!(body["session"]["timer_minutes"], 5);
    assert_eq!(body["session"]["remaining_display"], "5:00");

    let (_, body) = send(&app, "POST", "/playback/toggle", None).await;
    assert_eq!(body["status"], "stopped");
    assert_eq!(body["session"]["remaining_display"], Value::Null);
}

#[tokio::test]
async fn sound_and_theme_validation() {
    let app = app();

    let (status, _) = send(&app, "POST", "/sound", Some(json!({ "file": "../etc/passwd" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/sound",
        Some(json!({ "file": "waves.mp3", "autoplay": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["sound"], "waves.mp3");
    assert_eq!(body["session"]["is_playing"], true);

    let (status, _) = send(&app, "POST", "/theme", Some(json!({ "theme": "neon" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "POST", "/theme", Some(json!({ "theme": "aurora" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["theme"], "aurora");
}

#[tokio::test]
async fn status_tracks_the_last_action() {
    let app = app();

    let (_, body) = send(&app, "GET", "/status", None).await;
    assert_eq!(body["last_action"], Value::Null);
    assert_eq!(body["session"]["sound"], "rain.mp3");
    assert_eq!(body["session"]["volume"], 0.6);

    send(&app, "POST", "/volume", Some(json!({ "percent": 45 }))).await;
    let (status, body) = send(&app, "GET", "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["last_action"], "volume");
    assert_eq!(body["session"]["volume"], 0.45);
    assert_eq!(body["port"], 20554);
}
