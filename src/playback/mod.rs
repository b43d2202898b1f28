//! Audio playback module
//! 
//! This module contains the playback primitive the session controller drives
//! and its implementations. Decoding and mixing are left to the backend.

pub mod player;
pub mod process;

// Re-export main types
pub use player::{PlaybackError, Player, SilentPlayer};
pub use process::ProcessPlayer;
