use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::trace;

use super::{CacheStore, CachedValue};

/// Inserts between two sweeps of expired entries.
const DEFAULT_SWEEP_INTERVAL: usize = 256;

#[derive(Debug)]
struct Slot {
    value: CachedValue,
    /// `None` never expires.
    expires_at: Option<Instant>,
    tags: Vec<String>,
}

impl Slot {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-process [`CacheStore`] with per-entry expiry.
///
/// Expired entries are dropped when read and by a sweep that runs every few
/// inserts, so keys that are never read again do not pile up.
#[derive(Debug)]
pub struct MemoryCacheStore {
    entries: DashMap<String, Slot>,
    tagged: bool,
    sweep_interval: usize,
    inserts: AtomicUsize,
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            tagged: true,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            inserts: AtomicUsize::new(0),
        }
    }

    /// A store that reports no tag support and ignores tags on `put`.
    pub fn untagged() -> Self {
        Self {
            tagged: false,
            ..Self::new()
        }
    }

    /// Sweep expired entries every `interval` inserts (at least every insert).
    pub fn with_sweep_interval(mut self, interval: usize) -> Self {
        self.sweep_interval = interval.max(1);
        self
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, slot| !slot.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    /// Number of stored entries, expired ones included until they are swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<CachedValue>> {
        let now = Instant::now();
        match self.entries.get(key) {
            None => return Ok(None),
            Some(slot) if !slot.is_expired(now) => return Ok(Some(slot.value.clone())),
            Some(_) => {}
        }

        // read guard is released above; removing under it would deadlock the shard
        self.entries.remove_if(key, |_, slot| slot.is_expired(now));
        Ok(None)
    }

    async fn put(&self, key: &str, value: CachedValue, ttl: Duration, tags: &[String]) -> anyhow::Result<()> {
        if ttl.is_zero() {
            return Ok(());
        }

        let slot = Slot {
            value,
            expires_at: Instant::now().checked_add(ttl),
            tags: if self.tagged { tags.to_vec() } else { Vec::new() },
        };
        self.entries.insert(key.to_string(), slot);

        if (self.inserts.fetch_add(1, Ordering::Relaxed) + 1) % self.sweep_interval == 0 {
            let removed = self.purge_expired();
            if removed > 0 {
                trace!(removed, "swept expired cache entries");
            }
        }
        Ok(())
    }

    fn supports_tags(&self) -> bool {
        self.tagged
    }

    async fn flush_tags(&self, tags: &[String]) -> anyhow::Result<bool> {
        if !self.tagged {
            return Ok(false);
        }
        self.entries
            .retain(|_, slot| !slot.tags.iter().any(|tag| tags.contains(tag)));
        Ok(true)
    }

    async fn flush(&self) -> anyhow::Result<bool> {
        self.entries.clear();
        Ok(true)
    }
}
