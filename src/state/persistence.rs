//! Snapshot persistence for the session state

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::session_state::{brightness_from_percent, is_valid_sound, SessionState, TimerPreset};
use crate::storage::KeyValueStore;

/// Key the snapshot is stored under
pub const STORE_KEY: &str = "nightlight-state";

/// The persisted subset of [`SessionState`]
#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    sound: &'a str,
    volume: f64,
    brightness: u8,
    #[serde(rename = "timerMinutes")]
    timer_minutes: TimerPreset,
}

/// Load the session state, falling back to defaults field by field.
///
/// Never fails: a missing record, invalid JSON or a field of the wrong type
/// leaves the corresponding default in place.
pub fn load_state(store: &dyn KeyValueStore) -> SessionState {
    let mut state = SessionState::new();

    let Some(raw) = store.get(STORE_KEY) else {
        debug!("No stored session state, using defaults");
        return state;
    };

    let data: Value = match serde_json::from_str(&raw) {
        Ok(data) => data,
        Err(e) => {
            warn!("Ignoring unreadable session state: {}", e);
            return state;
        }
    };

    if let Some(sound) = data.get("sound").and_then(Value::as_str) {
        if is_valid_sound(sound) {
            state.sound = sound.to_string();
        } else {
            warn!("Ignoring stored sound {:?}", sound);
        }
    }
    if let Some(volume) = data.get("volume").and_then(Value::as_f64) {
        state.volume = volume.clamp(0.0, 1.0);
    }
    if let Some(brightness) = data.get("brightness").and_then(Value::as_f64) {
        state.brightness = brightness_from_percent(brightness);
    }
    if let Some(timer) = data.get("timerMinutes") {
        match TimerPreset::from_json(timer) {
            Some(preset) => state.timer = preset,
            None => debug!("Ignoring stored timer value {}", timer),
        }
    }

    debug!("Restored session state: {:?}", state);
    state
}

/// Save the persisted fields. Storage failures are logged and dropped; the
/// in-memory state stays authoritative.
pub fn save_state(store: &dyn KeyValueStore, state: &SessionState) {
    let snapshot = Snapshot {
        sound: &state.sound,
        volume: state.volume,
        brightness: state.brightness,
        timer_minutes: state.timer,
    };

    let data = match serde_json::to_string(&snapshot) {
        Ok(data) => data,
        Err(e) => {
            warn!("Failed to encode session state: {}", e);
            return;
        }
    };

    if let Err(e) = store.set(STORE_KEY, &data) {
        warn!("Failed to save session state: {}", e);
    }
}
