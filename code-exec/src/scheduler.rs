use std::future;
use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::debug;

use crate::types::Language;

/// A single restartable countdown.
///
/// Every change pushes the deadline out by the full delay, so a burst of
/// changes collapses into one fire. At most one fire is ever pending.
#[derive(Debug)]
pub struct DebounceScheduler {
    delay: Duration,
    deadline: Option<Instant>,
}

impl DebounceScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Restart the countdown. The language only matters for logging; the
    /// buffer that runs is whichever is active when the countdown fires.
    pub fn notify_changed(&mut self, language: Language) {
        debug!("{} buffer changed, restarting countdown", language);
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Drop the pending fire, if any
    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            debug!("Pending run cancelled");
        }
    }

    /// Resolves once the armed countdown elapses and disarms it. Pending
    /// forever while nothing is armed.
    ///
    /// Cancel safe: dropping the future keeps the deadline, so it can be
    /// recreated on every loop iteration.
    pub async fn fired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                time::sleep_until(deadline).await;
                self.deadline = None;
            }
            None => future::pending::<()>().await,
        }
    }
}
