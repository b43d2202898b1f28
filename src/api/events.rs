//! Server-sent event stream of session and countdown updates

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{
    future,
    stream::{self, Stream, StreamExt},
};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::AppState;

fn json_event(name: &str, data: &impl Serialize) -> Event {
    match Event::default().event(name).json_data(data) {
        Ok(event) => event,
        Err(e) => {
            warn!("Failed to encode {} event: {}", name, e);
            Event::default().event("error").data(e.to_string())
        }
    }
}

/// Handle GET /events - Stream `session` and `timer` events.
///
/// The current status is sent first so a fresh client can render at once.
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let initial = json_event("session", &state.controller.status());

    let sessions = stream::unfold(state.controller.subscribe(), |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(status) => return Some((json_event("session", &status), rx)),
                Err(RecvError::Lagged(skipped)) => {
                    debug!("Event stream lagged, skipped {} updates", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    let timers = stream::unfold(state.controller.timer_updates(), |mut rx| async move {
        rx.changed().await.ok()?;
        let timer = rx.borrow_and_update().clone();
        Some((json_event("timer", &timer), rx))
    });

    let events = stream::once(future::ready(initial))
        .chain(stream::select(sessions, timers))
        .map(Ok::<_, Infallible>);

    Sse::new(events).keep_alive(KeepAlive::default())
}
