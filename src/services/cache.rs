use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use crate::models::{CacheEntry, ModQuery, UpstreamPayload};

/// TTL-bounded response cache holding at most one entry per distinct query.
pub struct CacheStore {
    entries: HashMap<ModQuery, CacheEntry>,
    ttl: Duration,
}

impl CacheStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Returns the payload for `key` if an entry exists and is still fresh.
    /// Stale entries stay in place until the next `put` overwrites them; they
    /// are never returned.
    pub fn get(&self, key: &ModQuery, now: SystemTime) -> Option<UpstreamPayload> {
        let entry = self.entries.get(key)?;
        let age = now.duration_since(entry.stored_at).ok()?;
        if age < self.ttl {
            Some(entry.payload.clone())
        } else {
            None
        }
    }

    /// Unconditionally replaces any existing entry for `key`.
    pub fn put(&mut self, key: ModQuery, payload: UpstreamPayload, now: SystemTime) {
        self.entries.insert(
            key,
            CacheEntry {
                payload,
                stored_at: now,
            },
        );
    }
}
