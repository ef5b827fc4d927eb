//! Per-link protocol timers
//!
//! Timers run on simulated milliseconds so the whole state machine is
//! deterministic: a timer is armed with the current simulation time and
//! checked against later times through `perform_tick`.

use std::fmt;

/// A one-shot protocol timer with an expiry counter for retry logic.
#[derive(Debug, Clone)]
pub struct LinkTimer {
    /// Timer name, for logging
    name: &'static str,
    /// Timer interval in milliseconds
    duration_ms: u64,
    /// Absolute expiry time while running
    deadline_ms: Option<u64>,
    /// Number of times the timer has expired
    expiry_count: u32,
}

impl LinkTimer {
    /// Creates a stopped timer.
    pub fn new(name: &'static str, duration_ms: u64) -> Self {
        Self {
            name,
            duration_ms,
            deadline_ms: None,
            expiry_count: 0,
        }
    }

    /// Timer name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Starts (or restarts) the timer at `now_ms`.
    pub fn start(&mut self, now_ms: u64, clear_expiry_count: bool) {
        if clear_expiry_count {
            self.reset_expiry_count();
        }
        self.deadline_ms = Some(now_ms + self.duration_ms);
    }

    /// Stops the timer.
    pub fn stop(&mut self, clear_expiry_count: bool) {
        if clear_expiry_count {
            self.reset_expiry_count();
        }
        self.deadline_ms = None;
    }

    /// Resets the expiry count to zero.
    pub fn reset_expiry_count(&mut self) {
        self.expiry_count = 0;
    }

    /// True while the timer is armed.
    pub fn is_running(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Milliseconds until expiry, or `None` when stopped.
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.deadline_ms.map(|d| d.saturating_sub(now_ms))
    }

    /// Checks expiry against `now_ms`; returns `true` if the timer just
    /// expired on this tick, stopping it and bumping the expiry count.
    pub fn perform_tick(&mut self, now_ms: u64) -> bool {
        if let Some(deadline) = self.deadline_ms {
            if now_ms >= deadline {
                self.deadline_ms = None;
                self.expiry_count += 1;
                return true;
            }
        }
        false
    }

    /// Number of times the timer has expired since the count was cleared.
    pub fn expiry_count(&self) -> u32 {
        self.expiry_count
    }
}

impl fmt::Display for LinkTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.deadline_ms {
            Some(deadline) => write!(f, "{}(running, deadline={}ms)", self.name, deadline),
            None => write!(f, "{}(stopped)", self.name),
        }
    }
}
