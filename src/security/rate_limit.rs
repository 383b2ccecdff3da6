//! Per-client sliding window rate limiting.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::config::RateLimitConfig;

/// Time source for the limiter. Production uses [`SystemClock`]; tests drive
/// a manual clock to make window expiry deterministic.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Sliding-window limiter keyed by client identifier (IP).
///
/// Each key holds the timestamps of accepted attempts within the trailing
/// window. A check prunes expired stamps, then accepts iff the remaining
/// count is below capacity; only accepted attempts record a stamp. The
/// per-key dashmap entry lock makes check-then-record atomic under
/// concurrent workers. Keys are never evicted; growth is bounded by the
/// number of distinct clients seen since start.
pub struct SlidingWindowLimiter {
    window: Duration,
    max_attempts: usize,
    clock: Arc<dyn Clock>,
    windows: DashMap<String, VecDeque<Instant>>,
}

impl SlidingWindowLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            window: Duration::from_secs(config.window_secs),
            max_attempts: config.max_attempts,
            clock,
            windows: DashMap::new(),
        }
    }

    /// Check and record one attempt for `key`. Side-effecting: acceptance
    /// consumes capacity.
    pub fn allow(&self, key: &str) -> bool {
        let now = self.clock.now();
        let mut bucket = self.windows.entry(key.to_string()).or_default();

        while let Some(front) = bucket.front() {
            if now.duration_since(*front) > self.window {
                bucket.pop_front();
            } else {
                break;
            }
        }

        if bucket.len() < self.max_attempts {
            bucket.push_back(now);
            true
        } else {
            false
        }
    }
}
