//! State management module
//! 
//! This module contains the session state, its persistence, and the
//! controller that keeps playback and the sleep timer consistent with it.

pub mod session_state;
pub mod persistence;
pub mod timer_state;
pub mod controller;
pub mod app_state;

// Re-export main types
pub use session_state::{SessionState, Theme, TimerPreset, THEMES, TIMER_PRESETS};
pub use persistence::{load_state, save_state, STORE_KEY};
pub use timer_state::TimerState;
pub use controller::{ControlError, SessionController, SessionStatus};
pub use app_state::AppState;
