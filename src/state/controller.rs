//! Session controller: owns the session state and keeps playback, storage
//! and the sleep timer consistent with it

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use futures::future::BoxFuture;
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{
    persistence::{load_state, save_state},
    session_state::{
        brightness_from_percent, is_valid_sound, volume_from_percent, SessionState, Theme,
        TimerPreset,
    },
    TimerState,
};
use crate::{
    playback::{PlaybackError, Player},
    storage::KeyValueStore,
    tasks::Countdown,
};

/// Errors returned for user intents the controller refuses
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    #[error("invalid sound identifier: {0:?}")]
    InvalidSound(String),

    #[error("timer must be one of the presets or disabled, got {0}")]
    InvalidTimer(String),
}

/// Everything the display layer renders, captured at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub sound: String,
    pub volume: f64,
    pub brightness: u8,
    pub timer_minutes: TimerPreset,
    pub timer_label: String,
    pub is_playing: bool,
    pub theme: Theme,
    pub dim_factor: f64,
    pub glow_strength: f64,
    pub timer: TimerState,
    pub remaining_display: Option<String>,
}

#[derive(Debug)]
struct Inner {
    state: SessionState,
    countdown: Countdown,
    /// Bumped on every start request and every explicit stop; only the
    /// completion carrying the current value may change `is_playing`.
    generation: u64,
    pending_start: Option<u64>,
}

type StartRequest = (u64, BoxFuture<'static, Result<(), PlaybackError>>);

/// Owns [`SessionState`] and the single sleep-timer [`Countdown`].
///
/// All mutations go through this type. The lock is never held across an
/// await; playback starts are requested under the lock and resolved after.
pub struct SessionController {
    inner: Mutex<Inner>,
    player: Arc<dyn Player>,
    store: Arc<dyn KeyValueStore>,
    /// Channel for session state change notifications
    state_change_tx: broadcast::Sender<SessionStatus>,
    /// Channel for countdown ticks
    timer_update_tx: Arc<watch::Sender<TimerState>>,
    /// Keep the receiver alive to prevent channel closure
    _timer_update_rx: watch::Receiver<TimerState>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl SessionController {
    /// Restore the stored session and prime the player with it. Playback
    /// always starts stopped.
    pub fn new(player: Arc<dyn Player>, store: Arc<dyn KeyValueStore>) -> Arc<Self> {
        let state = load_state(store.as_ref());
        info!(
            "Session restored: sound={}, volume={:.2}, brightness={}, timer={}",
            state.sound,
            state.volume,
            state.brightness,
            state.timer.label()
        );

        player.set_source(&state.sound);
        player.load();
        player.set_volume(state.volume);

        let (state_change_tx, _) = broadcast::channel(100);
        let (timer_update_tx, timer_update_rx) = watch::channel(TimerState::inactive());
        let timer_update_tx = Arc::new(timer_update_tx);

        Arc::new(Self {
            inner: Mutex::new(Inner {
                state,
                countdown: Countdown::new(Arc::clone(&timer_update_tx)),
                generation: 0,
                pending_start: None,
            }),
            player,
            store,
            state_change_tx,
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Subscribe to session state changes
    pub fn subscribe(&self) -> broadcast::Receiver<SessionStatus> {
        self.state_change_tx.subscribe()
    }

    /// Watch the countdown indicator
    pub fn timer_updates(&self) -> watch::Receiver<TimerState> {
        self.timer_update_tx.subscribe()
    }

    /// Copy of the current session state
    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// Current status snapshot for the display layer
    pub fn status(&self) -> SessionStatus {
        Self::status_of(&self.lock())
    }

    fn status_of(inner: &Inner) -> SessionStatus {
        let state = &inner.state;
        let timer = inner.countdown.timer_state();
        SessionStatus {
            sound: state.sound.clone(),
            volume: state.volume,
            brightness: state.brightness,
            timer_minutes: state.timer,
            timer_label: state.timer.label(),
            is_playing: state.is_playing,
            theme: state.theme.clone(),
            dim_factor: state.dim_factor(),
            glow_strength: state.glow_strength(),
            remaining_display: timer.display(),
            timer,
        }
    }

    fn notify(&self, status: SessionStatus) {
        if let Err(e) = self.state_change_tx.send(status) {
            debug!("No state change listeners: {}", e);
        }
    }

    fn persist(&self, inner: &Inner) {
        save_state(self.store.as_ref(), &inner.state);
    }

    /// Switch to another track. Any current playback stops; with `autoplay`
    /// the new track is started.
    pub async fn set_sound(
        self: &Arc<Self>,
        file: &str,
        autoplay: bool,
    ) -> Result<SessionStatus, ControlError> {
        if !is_valid_sound(file) {
            return Err(ControlError::InvalidSound(file.to_string()));
        }

        let (status, request) = {
            let mut inner = self.lock();
            self.stop_locked(&mut inner);
            inner.state.sound = file.to_string();
            self.player.set_source(file);
            self.player.load();
            self.persist(&inner);
            info!("Sound set to {}", file);

            let request = autoplay.then(|| self.begin_start(&mut inner));
            (Self::status_of(&inner), request)
        };
        self.notify(status);

        if let Some((generation, start)) = request {
            self.complete_start(generation, start.await);
        }
        Ok(self.status())
    }

    /// Start playback when stopped, stop it when playing
    pub async fn toggle_playback(self: &Arc<Self>) -> SessionStatus {
        let request = {
            let mut inner = self.lock();
            if inner.state.is_playing {
                self.stop_locked(&mut inner);
                self.persist(&inner);
                info!("Playback stopped");
                let status = Self::status_of(&inner);
                drop(inner);
                self.notify(status);
                None
            } else {
                Some(self.begin_start(&mut inner))
            }
        };

        if let Some((generation, start)) = request {
            self.complete_start(generation, start.await);
        }
        self.status()
    }

    fn begin_start(&self, inner: &mut Inner) -> StartRequest {
        inner.generation += 1;
        inner.pending_start = Some(inner.generation);
        debug!("Requesting playback start {}", inner.generation);
        (inner.generation, self.player.play())
    }

    fn complete_start(self: &Arc<Self>, generation: u64, result: Result<(), PlaybackError>) {
        let status = {
            let mut inner = self.lock();

            if inner.generation != generation {
                debug!("Ignoring superseded playback start {}", generation);
                // a late success must not leave audio running behind a stop
                if result.is_ok() && inner.pending_start.is_none() && !inner.state.is_playing {
                    self.player.pause();
                }
                return;
            }
            inner.pending_start = None;

            match result {
                Ok(()) => {
                    inner.state.is_playing = true;
                    info!("Playback started: {}", inner.state.sound);
                    self.restart_countdown_locked(&mut inner);
                    self.persist(&inner);
                }
                Err(e) => {
                    warn!("Unable to start audio: {}", e);
                    // an earlier superseded start may have succeeded meanwhile
                    self.player.pause();
                    inner.state.is_playing = false;
                }
            }
            Self::status_of(&inner)
        };
        self.notify(status);
    }

    /// Pause the primitive and drop every trace of active playback
    fn stop_locked(&self, inner: &mut Inner) {
        self.player.pause();
        inner.state.is_playing = false;
        inner.generation += 1;
        inner.pending_start = None;
        inner.countdown.cancel();
    }

    /// Set the volume from a slider percentage
    pub fn set_volume(&self, percent: f64) -> SessionStatus {
        let status = {
            let mut inner = self.lock();
            inner.state.volume = volume_from_percent(percent);
            self.player.set_volume(inner.state.volume);
            self.persist(&inner);
            debug!("Volume set to {:.2}", inner.state.volume);
            Self::status_of(&inner)
        };
        self.notify(status.clone());
        status
    }

    /// Set the brightness from a slider percentage
    pub fn set_brightness(&self, percent: f64) -> SessionStatus {
        let status = {
            let mut inner = self.lock();
            inner.state.brightness = brightness_from_percent(percent);
            self.persist(&inner);
            debug!(
                "Brightness set to {} (dim {:.2})",
                inner.state.brightness,
                inner.state.dim_factor()
            );
            Self::status_of(&inner)
        };
        self.notify(status.clone());
        status
    }

    /// Select a timer preset. A running countdown restarts from the new
    /// duration; disabling it leaves playback running.
    pub fn set_timer_preset(self: &Arc<Self>, preset: TimerPreset) -> SessionStatus {
        let status = {
            let mut inner = self.lock();
            inner.state.timer = preset;
            self.restart_countdown_locked(&mut inner);
            self.persist(&inner);
            info!("Sleep timer set to {}", preset.label());
            Self::status_of(&inner)
        };
        self.notify(status.clone());
        status
    }

    /// Advance to the next preset in the cycle
    pub fn cycle_timer_preset(self: &Arc<Self>) -> SessionStatus {
        let next = self.lock().state.timer.next();
        self.set_timer_preset(next)
    }

    /// Select a visual theme by name
    pub fn set_theme(&self, name: &str) -> Result<SessionStatus, ControlError> {
        let theme = Theme::parse(name).ok_or_else(|| ControlError::UnknownTheme(name.to_string()))?;
        let status = {
            let mut inner = self.lock();
            inner.state.theme = theme;
            info!("Theme set to {}", inner.state.theme);
            Self::status_of(&inner)
        };
        self.notify(status.clone());
        Ok(status)
    }

    /// Cancel any countdown and, if playing with a timer set, arm a new one
    pub fn restart_countdown(self: &Arc<Self>) {
        let status = {
            let mut inner = self.lock();
            self.restart_countdown_locked(&mut inner);
            Self::status_of(&inner)
        };
        self.notify(status);
    }

    fn restart_countdown_locked(self: &Arc<Self>, inner: &mut Inner) {
        inner.countdown.cancel();
        if !inner.state.is_playing {
            return;
        }
        let Some(minutes) = inner.state.timer.minutes() else {
            return;
        };

        let controller = Arc::downgrade(self);
        inner
            .countdown
            .arm(Duration::from_secs(u64::from(minutes) * 60), move |epoch| {
                if let Some(controller) = controller.upgrade() {
                    controller.expire_countdown(epoch);
                }
            });
        info!("Sleep timer armed for {} minutes", minutes);
    }

    fn expire_countdown(&self, epoch: u64) {
        let status = {
            let mut inner = self.lock();
            if !inner.countdown.is_armed() || inner.countdown.epoch() != epoch {
                debug!("Ignoring expiry of replaced countdown {}", epoch);
                return;
            }
            info!("Sleep timer elapsed, stopping playback");
            self.stop_locked(&mut inner);
            Self::status_of(&inner)
        };
        self.notify(status);
    }

    /// Disarm the countdown without touching playback
    pub fn cancel_countdown(&self) {
        let status = {
            let mut inner = self.lock();
            inner.countdown.cancel();
            Self::status_of(&inner)
        };
        self.notify(status);
    }

    /// Time until auto-stop, if a countdown is armed and not yet elapsed
    pub fn remaining_time(&self) -> Option<Duration> {
        self.lock().countdown.remaining()
    }

    /// Stop playback and timers before the process exits
    pub fn shutdown(&self) {
        let status = {
            let mut inner = self.lock();
            self.stop_locked(&mut inner);
            Self::status_of(&inner)
        };
        info!("Session controller shut down");
        self.notify(status);
    }
}
