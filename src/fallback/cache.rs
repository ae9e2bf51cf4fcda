//! TTL-bounded memo of prior resolutions.
//!
//! Entries are replaced wholesale and never updated in place, apart from the
//! access counter. Every lock is held for one bounded map operation and never
//! across an await point.

use crate::fallback::types::{ContentKey, FallbackResult};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Default lifetime of a cached resolution.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// Entry count above which a write triggers cleanup.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Maximum low-access entries evicted by one cleanup pass.
pub const DEFAULT_CLEANUP_BATCH: usize = 100;

/// Cache sizing and lifetime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub max_entries: usize,
    pub cleanup_batch: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
            max_entries: DEFAULT_MAX_ENTRIES,
            cleanup_batch: DEFAULT_CLEANUP_BATCH,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    result: FallbackResult,
    created_at: Instant,
    ttl: Duration,
    access_count: u64,
}

impl CacheEntry {
    fn new(result: FallbackResult, ttl: Duration) -> Self {
        Self {
            result,
            created_at: Instant::now(),
            ttl,
            access_count: 1,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.created_at + self.ttl
    }
}

/// What one cleanup pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    /// Entries dropped because their TTL had elapsed
    pub expired: usize,
    /// Live entries evicted for low access
    pub evicted: usize,
}

impl CleanupReport {
    pub fn removed(&self) -> usize {
        self.expired + self.evicted
    }
}

/// Cache statistics reported by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Number of stored entries, including expired ones not yet swept
    pub size: usize,
    /// Raw number of cache hits since startup (not a ratio)
    pub hit_counter: u64,
    /// Sum of access counts over live entries
    pub total_access_count: u64,
}

/// Resolution cache keyed by `(content_id, language, category)`.
#[derive(Debug)]
pub struct ResolutionCache {
    entries: Mutex<HashMap<ContentKey, CacheEntry>>,
    config: CacheConfig,
}

impl ResolutionCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ContentKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Live cached result for `key`.
    ///
    /// Expired entries are deleted on read. A hit bumps the entry's access count.
    pub fn get(&self, key: &ContentKey) -> Option<FallbackResult> {
        let now = Instant::now();
        let mut entries = self.lock();

        if entries.get(key)?.is_expired(now) {
            entries.remove(key);
            debug!("Cache entry expired for {}", key);
            return None;
        }

        let entry = entries.get_mut(key)?;
        entry.access_count += 1;
        Some(entry.result.clone())
    }

    /// Store a fresh entry for `key`, replacing any previous one.
    ///
    /// Runs a cleanup pass when the entry count exceeds the configured ceiling.
    pub fn insert(&self, key: ContentKey, result: FallbackResult) -> Option<CleanupReport> {
        let mut entries = self.lock();
        entries.insert(key, CacheEntry::new(result, self.config.ttl));

        if entries.len() > self.config.max_entries {
            Some(self.cleanup_locked(&mut entries))
        } else {
            None
        }
    }

    /// Remove expired entries, then evict up to one batch of low-access entries.
    pub fn cleanup(&self) -> CleanupReport {
        let mut entries = self.lock();
        self.cleanup_locked(&mut entries)
    }

    fn cleanup_locked(&self, entries: &mut HashMap<ContentKey, CacheEntry>) -> CleanupReport {
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let expired = before - entries.len();

        let mut low_access: Vec<(Instant, ContentKey)> = entries
            .iter()
            .filter(|(_, entry)| entry.access_count < 2)
            .map(|(key, entry)| (entry.created_at, key.clone()))
            .collect();
        low_access.sort_by_key(|(created_at, _)| *created_at);

        let mut evicted = 0;
        for (_, key) in low_access.into_iter().take(self.config.cleanup_batch) {
            entries.remove(&key);
            evicted += 1;
        }

        let report = CleanupReport { expired, evicted };
        if report.removed() > 0 {
            debug!(
                "Cache cleanup removed {} expired and {} low-access entries ({} remain)",
                expired,
                evicted,
                entries.len()
            );
        }
        report
    }

    /// Drop every entry, returning how many were removed.
    pub fn clear(&self) -> usize {
        let mut entries = self.lock();
        let removed = entries.len();
        entries.clear();
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of access counts across entries that have not expired.
    pub fn total_access_count(&self) -> u64 {
        let now = Instant::now();
        self.lock()
            .values()
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.access_count)
            .sum()
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
