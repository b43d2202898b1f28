//! Timer state published to the display layer

use serde::{Deserialize, Serialize};

/// Countdown indicator: whether a sleep timer is armed and how long is left
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub active: bool,
    pub remaining_seconds: Option<u64>,
}

impl TimerState {
    /// Create an active timer state with remaining seconds
    pub fn active(remaining_seconds: u64) -> Self {
        Self {
            active: true,
            remaining_seconds: Some(remaining_seconds),
        }
    }

    /// Create an inactive timer state
    pub fn inactive() -> Self {
        Self {
            active: false,
            remaining_seconds: None,
        }
    }

    /// Check if the timer is active
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Get remaining seconds if timer is active
    pub fn remaining_seconds(&self) -> Option<u64> {
        if self.active {
            self.remaining_seconds
        } else {
            None
        }
    }

    /// Indicator text in `M:SS` form; hidden once nothing is left
    pub fn display(&self) -> Option<String> {
        self.remaining_seconds()
            .filter(|secs| *secs > 0)
            .map(format_remaining)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::inactive()
    }
}

/// Format whole seconds as `M:SS`
pub fn format_remaining(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_remaining(30 * 60), "30:00");
        assert_eq!(format_remaining(65), "1:05");
        assert_eq!(format_remaining(9), "0:09");
    }

    #[test]
    fn inactive_or_elapsed_timers_have_no_display() {
        assert_eq!(TimerState::inactive().display(), None);
        assert_eq!(TimerState::active(0).display(), None);
        assert_eq!(TimerState::active(1199).display().as_deref(), Some("19:59"));
    }
}
