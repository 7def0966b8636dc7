//! Session Timer
//!
//! Counts focused seconds and fires a single streak event once the
//! threshold is reached. The "fired" flag lives with the timer, so only a
//! fresh timer can fire again.

use chrono::NaiveDate;
use log::info;
use std::time::Duration;
use tokio::sync::mpsc;

/// 20 minutes
pub const DEFAULT_STREAK_THRESHOLD_SECS: u64 = 1200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakEvent {
    pub elapsed_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SessionTimer {
    elapsed_secs: u64,
    threshold_secs: u64,
    fired: bool,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new(DEFAULT_STREAK_THRESHOLD_SECS)
    }
}

impl SessionTimer {
    pub fn new(threshold_secs: u64) -> Self {
        Self {
            elapsed_secs: 0,
            threshold_secs,
            fired: false,
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Advances one second; returns the streak event the first time the
    /// threshold is reached
    pub fn tick(&mut self) -> Option<StreakEvent> {
        self.elapsed_secs += 1;
        if self.elapsed_secs >= self.threshold_secs && !self.fired {
            self.fired = true;
            return Some(StreakEvent {
                elapsed_secs: self.elapsed_secs,
            });
        }
        None
    }

    /// Elapsed time as `m:ss`
    pub fn display(&self) -> String {
        format_clock(self.elapsed_secs)
    }

    /// Ticks once per second until the streak fires, sending the event on
    /// `events`. Returns early if the receiver goes away.
    pub async fn run_until_streak(mut self, events: mpsc::Sender<StreakEvent>) -> Self {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        // first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Some(event) = self.tick() {
                info!("Focus goal reached after {}", self.display());
                let _ = events.send(event).await;
                return self;
            }
            if events.is_closed() {
                return self;
            }
        }
    }
}

pub fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Calendar-day label in the `Mon Jan 05 2026` form the web client wrote
pub fn day_label(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}
