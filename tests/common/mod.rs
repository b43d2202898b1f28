//! Shared test doubles

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use futures::future::BoxFuture;
use nightlight::playback::{PlaybackError, Player};
use tokio::sync::oneshot;

type Gate = oneshot::Sender<Result<(), PlaybackError>>;

#[derive(Default)]
struct Log {
    playing: bool,
    source: Option<String>,
    volume: f64,
    play_calls: usize,
    pause_calls: usize,
    deny: bool,
    gated: bool,
    gates: Vec<Option<Gate>>,
}

/// A player whose start requests succeed, fail, or wait for the test to
/// resolve them.
#[derive(Clone, Default)]
pub struct ScriptedPlayer {
    log: Arc<Mutex<Log>>,
}

impl ScriptedPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every start request fails, as when autoplay is blocked
    pub fn denying() -> Self {
        let player = Self::new();
        player.log.lock().unwrap().deny = true;
        player
    }

    /// Start requests stay pending until [`ScriptedPlayer::release`]
    pub fn gated() -> Self {
        let player = Self::new();
        player.log.lock().unwrap().gated = true;
        player
    }

    /// Resolve the `index`-th start request
    pub fn release(&self, index: usize, result: Result<(), PlaybackError>) {
        let gate = self.log.lock().unwrap().gates[index].take().unwrap();
        let _ = gate.send(result);
    }

    pub fn is_playing(&self) -> bool {
        self.log.lock().unwrap().playing
    }

    pub fn source(&self) -> Option<String> {
        self.log.lock().unwrap().source.clone()
    }

    pub fn volume(&self) -> f64 {
        self.log.lock().unwrap().volume
    }

    pub fn play_calls(&self) -> usize {
        self.log.lock().unwrap().play_calls
    }

    pub fn pause_calls(&self) -> usize {
        self.log.lock().unwrap().pause_calls
    }
}

impl Player for ScriptedPlayer {
    fn play(&self) -> BoxFuture<'static, Result<(), PlaybackError>> {
        let mut log = self.log.lock().unwrap();
        log.play_calls += 1;

        if log.deny {
            return Box::pin(async { Err(PlaybackError::Denied("autoplay blocked".into())) });
        }
        if !log.gated {
            log.playing = true;
            return Box::pin(async { Ok(()) });
        }

        let (tx, rx) = oneshot::channel();
        log.gates.push(Some(tx));
        let shared = Arc::clone(&self.log);
        Box::pin(async move {
            let result = rx
                .await
                .unwrap_or_else(|_| Err(PlaybackError::Denied("gate dropped".into())));
            if result.is_ok() {
                shared.lock().unwrap().playing = true;
            }
            result
        })
    }

    fn pause(&self) {
        let mut log = self.log.lock().unwrap();
        log.playing = false;
        log.pause_calls += 1;
    }

    fn set_volume(&self, volume: f64) {
        self.log.lock().unwrap().volume = volume;
    }

    fn set_source(&self, source: &str) {
        self.log.lock().unwrap().source = Some(source.to_string());
    }

    fn load(&self) {
        self.log.lock().unwrap().playing = false;
    }
}

/// Yield until `player` has seen `calls` start requests
pub async fn wait_for_play_calls(player: &ScriptedPlayer, calls: usize) {
    for _ in 0..100 {
        if player.play_calls() >= calls {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("player never reached {} play calls", calls);
}
