//! External-process playback backend

use std::{
    path::PathBuf,
    process::Stdio,
    sync::{Arc, Mutex},
};
use futures::future::BoxFuture;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use super::{PlaybackError, Player};

#[derive(Debug, Default)]
struct ProcessInner {
    source: Option<String>,
    volume: f64,
    child: Option<Child>,
}

/// Plays sounds by spawning an mpv-compatible command line player.
///
/// The track loops until paused. Volume changes apply from the next start
/// since the player process is not controlled once spawned.
#[derive(Debug, Clone)]
pub struct ProcessPlayer {
    program: String,
    sounds_dir: PathBuf,
    inner: Arc<Mutex<ProcessInner>>,
}

impl ProcessPlayer {
    /// Create a player that runs `program` on files found in `sounds_dir`
    pub fn new(program: impl Into<String>, sounds_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            sounds_dir: sounds_dir.into(),
            inner: Arc::new(Mutex::new(ProcessInner::default())),
        }
    }

    fn kill_child(inner: &mut ProcessInner) {
        if let Some(mut child) = inner.child.take() {
            match child.start_kill() {
                Ok(()) => debug!("Stopped player process {:?}", child.id()),
                Err(e) => warn!("Failed to stop player process: {}", e),
            }
        }
    }
}

impl Player for ProcessPlayer {
    fn play(&self) -> BoxFuture<'static, Result<(), PlaybackError>> {
        let program = self.program.clone();
        let sounds_dir = self.sounds_dir.clone();
        let inner = Arc::clone(&self.inner);

        Box::pin(async move {
            let (source, volume) = {
                let inner = inner
                    .lock()
                    .map_err(|e| PlaybackError::Denied(e.to_string()))?;
                (inner.source.clone(), inner.volume)
            };
            let source = source.ok_or(PlaybackError::NoSource)?;
            let path = sounds_dir.join(&source);

            if tokio::fs::metadata(&path).await.is_err() {
                return Err(PlaybackError::MissingSource(path.display().to_string()));
            }

            let child = Command::new(&program)
                .args(["--no-video", "--really-quiet", "--loop-file=inf"])
                .arg(format!("--volume={}", (volume * 100.0).round() as u32))
                .arg(&path)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true)
                .spawn()?;

            info!("Started {} for {} (pid {:?})", program, source, child.id());

            let mut inner = inner
                .lock()
                .map_err(|e| PlaybackError::Denied(e.to_string()))?;
            Self::kill_child(&mut inner);
            inner.child = Some(child);
            Ok(())
        })
    }

    fn pause(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            Self::kill_child(&mut inner);
        }
    }

    fn set_volume(&self, volume: f64) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.volume = volume;
            if inner.child.is_some() {
                debug!("Volume {:.2} takes effect on next start", volume);
            }
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
