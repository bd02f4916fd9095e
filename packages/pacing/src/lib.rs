#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Request pacing for rate-limited upstream providers.
//!
//! Nominatim allows one request per second and Google News throttles
//! bursts, so every provider client owns a [`Pacer`] and calls
//! [`Pacer::wait`] before each request. The pacer lives on the client, not
//! the request, so the spacing holds across concurrent requests that share
//! the client.
//!
//! [`Deadline`] bounds the total time a single pipeline run may spend on
//! upstream calls.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Minimum-interval gate between consecutive requests.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl Pacer {
    /// Creates a pacer that spaces requests at least `interval` apart.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    /// Creates a pacer from a millisecond interval (as stored in service
    /// TOML configs).
    #[must_use]
    pub fn from_millis(interval_ms: u64) -> Self {
        Self::new(Duration::from_millis(interval_ms))
    }

    /// The configured minimum spacing.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until the previous request slot is at least `interval` old,
    /// then claims the next slot.
    ///
    /// Concurrent callers queue on the internal lock, so slots are handed
    /// out one at a time.
    pub async fn wait(&self) {
        let mut last = self.last.lock().await;
        if let Some(prev) = *last {
            let ready_at = prev + self.interval;
            if ready_at > Instant::now() {
                log::trace!("pacing: sleeping {:?}", ready_at - Instant::now());
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Wall-clock budget for one pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// A deadline `budget` from now.
    #[must_use]
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
        }
    }

    /// Time left before the deadline, zero once it has passed.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    /// Whether the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Runs `future` with the remaining budget as its timeout.
    ///
    /// Returns `None` without polling `future` if the deadline has already
    /// passed, or if it elapses first.
    pub async fn run<F: Future>(&self, future: F) -> Option<F::Output> {
        if self.is_expired() {
            return None;
        }
        tokio::time::timeout(self.remaining(), future).await.ok()
    }
}
