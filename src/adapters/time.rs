//! System clock adapter.
//!
//! Wall-clock time from the OS (the Pi is expected to be NTP-synced) and a
//! blocking `thread::sleep` between cycles. When bound to a shutdown flag the
//! sleep is sliced so a signal ends the pause early.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::app::ports::ClockPort;

const SLEEP_SLICE: Duration = Duration::from_millis(250);

#[derive(Debug, Default, Clone)]
pub struct SystemClock {
    running: Option<Arc<AtomicBool>>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { running: None }
    }

    /// Sleeps return as soon as `running` is cleared.
    pub fn with_shutdown(running: Arc<AtomicBool>) -> Self {
        Self {
            running: Some(running),
        }
    }

    fn stopped(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|r| !r.load(Ordering::Relaxed))
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) {
        if self.running.is_none() {
            thread::sleep(duration);
            return;
        }
        let deadline = Instant::now() + duration;
        while !self.stopped() {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                break;
            }
            thread::sleep(left.min(SLEEP_SLICE));
        }
    }
}
