// src/engine/debounce.rs

use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// Trailing-edge debounce timer.
///
/// Every [`poke`](Debouncer::poke) pushes the deadline `wait` into the
/// future; the owner fires once [`expired`](Debouncer::expired) resolves and
/// then calls [`disarm`](Debouncer::disarm).
#[derive(Debug)]
pub struct Debouncer {
    wait: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            deadline: None,
        }
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    pub fn poke(&mut self) {
        self.poke_at(Instant::now());
    }

    pub fn poke_at(&mut self, now: Instant) {
        self.deadline = Some(now + self.wait);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| now >= d)
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    /// Resolves at the current deadline; never resolves while disarmed.
    pub async fn expired(&self) {
        match self.deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }
}
