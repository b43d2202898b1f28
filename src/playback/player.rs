//! Playback primitive trait and a silent implementation

use std::sync::Mutex;
use futures::future::{self, BoxFuture};

/// Reasons a playback start request can fail
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("no source selected")]
    NoSource,

    #[error("sound file not found: {0}")]
    MissingSource(String),

    #[error("playback denied: {0}")]
    Denied(String),

    #[error("failed to spawn player: {0}")]
    Spawn(#[from] std::io::Error),
}

/// The platform's media playback primitive.
///
/// `play` is asynchronous: callers learn about success or failure only when
/// the returned future resolves. Everything else takes effect immediately.
pub trait Player: Send + Sync {
    /// Request playback of the current source
    fn play(&self) -> BoxFuture<'static, Result<(), PlaybackError>>;

    /// Stop producing audio
    fn pause(&self);

    /// Set output volume, normalized to [0, 1]
    fn set_volume(&self, volume: f64);

    /// Select the track to play
    fn set_source(&self, source: &str);

    /// Reset the primitive after a source change
    fn load(&self);
}

#[derive(Debug, Default, Clone)]
struct SilentInner {
    source: Option<String>,
    volume: f64,
    playing: bool,
}

/// A player that tracks what it was asked to do without producing sound.
///
/// Used for `--silent` runs and for exercising the controller without audio
/// hardware.
#[derive(Debug, Default)]
pub struct SilentPlayer {
    inner: Mutex<SilentInner>,
}

impl SilentPlayer {
    /// Create a new silent player
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a play request succeeded and has not been paused since
    pub fn is_playing(&self) -> bool {
        self.inner.lock().map(|i| i.playing).unwrap_or(false)
    }

    /// Last source set on the player
    pub fn source(&self) -> Option<String> {
        self.inner.lock().ok().and_then(|i| i.source.clone())
    }

    /// Last volume set on the player
    pub fn volume(&self) -> f64 {
        self.inner.lock().map(|i| i.volume).unwrap_or(0.0)
    }
}

impl Player for SilentPlayer {
    fn play(&self) -> BoxFuture<'static, Result<(), PlaybackError>> {
        let result = match self.inner.lock() {
            Ok(mut inner) if inner.source.is_some() => {
                inner.playing = true;
                Ok(())
            }
            Ok(_) => Err(PlaybackError::NoSource),
            Err(e) => Err(PlaybackError::Denied(e.to_string())),
        };
        Box::pin(future::ready(result))
    }

    fn pause(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.playing = false;
        }
    }

    fn set_volume(&self, volume: f64) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.volume = volume;
        }
    }

    fn set_source(&self, source: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.source = Some(source.to_string());
        }
    }

    fn load(&self) {
        self.pause();
    }
}
