// Single-slot timer backing chart transitions
use crate::application::animation::{Scheduler, TransitionToken};
use std::time::Duration;
use tokio::time::Instant;

/// Holds at most one pending continuation; scheduling replaces it.
#[derive(Debug, Default)]
pub struct TimerSlot {
    pending: Option<(Instant, TransitionToken)>,
}

impl TimerSlot {
    /// Resolves when the pending continuation is due, never if there is none
    pub async fn expired(&self) -> TransitionToken {
        match self.pending {
            Some((deadline, token)) => {
                tokio::time::sleep_until(deadline).await;
                token
            }
            None => std::future::pending().await,
        }
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

/// Sleep until `due`, forever if there is nothing due
pub async fn sleep_until_due(due: Option<std::time::Instant>) {
    match due {
        Some(due) => tokio::time::sleep_until(Instant::from_std(due)).await,
        None => std::future::pending().await,
    }
}

impl Scheduler for TimerSlot {
    fn schedule(&mut self, delay: Duration, token: TransitionToken) {
        self.pending = Some((Instant::now() + delay, token));
    }
}
