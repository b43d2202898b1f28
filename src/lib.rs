//! Nightlight - A state-managed ambient sound service
//! 
//! This library provides the session controller behind a nightlight widget:
//! sound selection, volume, brightness dimming, a sleep timer that stops
//! playback, and persistence of those selections between runs.

pub mod config;
pub mod state;
pub mod api;
pub mod playback;
pub mod storage;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, SessionController, SessionState, SessionStatus};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
