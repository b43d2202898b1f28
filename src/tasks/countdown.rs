//! Sleep timer countdown: a one-shot stop task paired with a 1 Hz tick task

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval_at, sleep_until, Instant},
};
use tracing::debug;

use crate::state::TimerState;

const TICK: Duration = Duration::from_secs(1);

/// An armed-or-idle countdown.
///
/// Both background tasks are owned here and always aborted together, so at
/// most one stop action and one tick stream exist per `Countdown`. Each
/// arming gets a fresh epoch that is handed to the expiry callback, which
/// lets the owner recognize callbacks from a countdown it already replaced.
#[derive(Debug)]
pub struct Countdown {
    epoch: u64,
    deadline: Option<Instant>,
    stop_task: Option<JoinHandle<()>>,
    tick_task: Option<JoinHandle<()>>,
    timer_update_tx: Arc<watch::Sender<TimerState>>,
}

impl Countdown {
    /// Create an idle countdown that publishes its ticks on `timer_update_tx`
    pub fn new(timer_update_tx: Arc<watch::Sender<TimerState>>) -> Self {
        Self {
            epoch: 0,
            deadline: None,
            stop_task: None,
            tick_task: None,
            timer_update_tx,
        }
    }

    /// Arm for `duration`, replacing any running countdown. `on_expire` runs
    /// once at the deadline with the epoch returned here.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm<F>(&mut self, duration: Duration, on_expire: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.abort_tasks();
        self.epoch += 1;
        let epoch = self.epoch;
        let deadline = Instant::now() + duration;
        self.deadline = Some(deadline);

        self.timer_update_tx
            .send_replace(TimerState::active(duration.as_secs()));

        self.stop_task = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            debug!("Countdown {} reached its deadline", epoch);
            on_expire(epoch);
        }));

        let tx = Arc::clone(&self.timer_update_tx);
        self.tick_task = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK, TICK);
            loop {
                interval.tick().await;
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    break;
                }
                tx.send_replace(TimerState::active(remaining.as_secs()));
            }
        }));

        debug!("Countdown {} armed for {:?}", epoch, duration);
        epoch
    }

    /// Disarm both tasks and publish an inactive timer. Returns whether a
    /// countdown was armed.
    pub fn cancel(&mut self) -> bool {
        let was_armed = self.deadline.is_some();
        self.abort_tasks();
        self.deadline = None;
        self.timer_update_tx.send_replace(TimerState::inactive());
        if was_armed {
            debug!("Countdown {} cancelled", self.epoch);
        }
        was_armed
    }

    /// Time left until the deadline; `None` when idle or already elapsed
    pub fn remaining(&self) -> Option<Duration> {
        let deadline = self.deadline?;
        let remaining = deadline.saturating_duration_since(Instant::now());
        (!remaining.is_zero()).then_some(remaining)
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Epoch of the most recent arming
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Current indicator value derived from the deadline
    pub fn timer_state(&self) -> TimerState {
        match self.remaining() {
            Some(remaining) => TimerState::active(remaining.as_secs()),
            None => TimerState::inactive(),
        }
    }

    fn abort_tasks(&mut self) {
        if let Some(task) = self.stop_task.take() {
            task.abort();
        }
        if let Some(task) = self.tick_task.take() {
            task.abort();
        }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.abort_tasks();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    fn countdown() -> (Countdown, watch::Receiver<TimerState>) {
        let (tx, rx) = watch::channel(TimerState::inactive());
        (Countdown::new(Arc::new(tx)), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_at_the_deadline() {
        let (mut countdown, _rx) = countdown();
        let fired = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&fired);

        let epoch = countdown.arm(Duration::from_secs(5), move |e| {
            seen.store(e, Ordering::SeqCst);
        });
        assert_eq!(countdown.remaining(), Some(Duration::from_secs(5)));

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), epoch);
        assert_eq!(countdown.remaining(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_replaces_the_previous_pair() {
        let (mut countdown, _rx) = countdown();
        let fired = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let fired = Arc::clone(&fired);
            countdown.arm(Duration::from_secs(3), move |_| {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(countdown.epoch(), 2);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_publish_remaining_time_until_cancelled() {
        let (mut countdown, rx) = countdown();
        countdown.arm(Duration::from_secs(60), |_| {});
        assert_eq!(*rx.borrow(), TimerState::active(60));

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(*rx.borrow(), TimerState::active(58));

        assert!(countdown.cancel());
        assert_eq!(*rx.borrow(), TimerState::inactive());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(*rx.borrow(), TimerState::inactive());
        assert!(!countdown.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_countdown_never_fires() {
        let (mut countdown, _rx) = countdown();
        let fired = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&fired);
        countdown.arm(Duration::from_secs(1), move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        countdown.cancel();

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!countdown.is_armed());
    }
}
