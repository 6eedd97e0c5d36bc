//! Process-lifetime service context.
//!
//! Holds the only state that outlives a single request: the instant the
//! service started and the number of status reports produced so far.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Start time and request counter, shared via `Arc`.
#[derive(Debug)]
pub struct ServiceContext {
    started_at: Instant,
    request_count: AtomicU64,
}

impl ServiceContext {
    /// Capture the start instant now.
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    pub fn started_at(started_at: Instant) -> Self {
        Self {
            started_at,
            request_count: AtomicU64::new(0),
        }
    }

    /// Time elapsed since start.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Increment the counter, returning the new value.
    pub fn record_request(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }
}

impl Default for ServiceContext {
    fn default() -> Self {
        Self::new()
    }
}
