use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use crate::models::RateWindow;

/// Fixed-window request counter, one window per client key.
pub struct RateLimiter {
    windows: HashMap<String, RateWindow>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: HashMap::new(),
            max_requests,
            window,
        }
    }

    /// Admits or rejects one request from `client_key` at `now`.
    ///
    /// A fresh or expired window restarts at count 1 and admits; within a
    /// window the count keeps incrementing, so every call past the ceiling
    /// keeps rejecting until the window rolls over.
    pub fn admit(&mut self, client_key: &str, now: SystemTime) -> bool {
        let window = self.windows.entry(client_key.to_string()).or_insert(RateWindow {
            count: 0,
            window_start: now,
        });

        // A `now` earlier than window_start (clock skew) counts as in-window.
        let expired = now
            .duration_since(window.window_start)
            .map_or(false, |elapsed| elapsed >= self.window);
        if expired {
            window.count = 0;
            window.window_start = now;
        }

        window.count = window.count.saturating_add(1);
        window.count <= self.max_requests
    }
}
