//! Resolution analytics.
//!
//! Running counters over every resolution outcome, including cache hits and
//! emergency results. Counters live for the lifetime of the engine; clearing
//! the cache does not reset them.

use crate::fallback::types::{FallbackResult, Quality};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
struct Counters {
    total_requests: u64,
    fallback_requests: u64,
    language_usage: BTreeMap<String, u64>,
    missing_field_counts: BTreeMap<String, u64>,
    average_completeness: f64,
    average_resolve_time_ms: f64,
    quality_distribution: BTreeMap<Quality, u64>,
}

/// Engine-wide analytics accumulator.
#[derive(Debug, Default)]
pub struct AnalyticsRecorder {
    counters: Mutex<Counters>,

    /// Number of resolutions served from cache
    cache_hits: AtomicU64,
}

impl AnalyticsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one resolution outcome and how long it took.
    pub fn record_outcome(&self, result: &FallbackResult, elapsed: Duration) {
        let mut c = self.counters.lock().unwrap_or_else(PoisonError::into_inner);

        c.total_requests += 1;
        if result.fallback_used {
            c.fallback_requests += 1;
        }

        *c.language_usage
            .entry(result.actual_language.clone())
            .or_insert(0) += 1;
        for field in &result.missing_fields {
            *c.missing_field_counts.entry(field.clone()).or_insert(0) += 1;
        }
        *c.quality_distribution.entry(result.quality).or_insert(0) += 1;

        // Incremental means: avg += (x - avg) / n
        let n = c.total_requests as f64;
        c.average_completeness += (f64::from(result.completeness) - c.average_completeness) / n;
        let millis = elapsed.as_secs_f64() * 1000.0;
        c.average_resolve_time_ms += (millis - c.average_resolve_time_ms) / n;
    }

    /// Record a resolution served from cache.
    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the raw cache hit count.
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Copy of the current counters.
    pub fn snapshot(&self) -> AnalyticsSnapshot {
        let c = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        let hits = self.cache_hits();

        let fallback_rate = if c.total_requests > 0 {
            c.fallback_requests as f64 / c.total_requests as f64
        } else {
            0.0
        };
        let cache_hit_ratio = if c.total_requests > 0 {
            hits as f64 / c.total_requests as f64
        } else {
            0.0
        };

        AnalyticsSnapshot {
            total_requests: c.total_requests,
            fallback_requests: c.fallback_requests,
            fallback_rate,
            language_usage: c.language_usage.clone(),
            missing_field_counts: c.missing_field_counts.clone(),
            average_completeness: c.average_completeness,
            average_resolve_time_ms: c.average_resolve_time_ms,
            quality_distribution: c.quality_distribution.clone(),
            cache_hit_rate: hits,
            cache_hit_ratio,
        }
    }
}

/// Point-in-time copy of the analytics counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_requests: u64,

    pub fallback_requests: u64,

    /// fallback_requests / total_requests (0.0-1.0)
    pub fallback_rate: f64,

    /// Resolutions per actually-used language
    pub language_usage: BTreeMap<String, u64>,

    /// How often each field was still missing in a returned result
    pub missing_field_counts: BTreeMap<String, u64>,

    pub average_completeness: f64,

    pub average_resolve_time_ms: f64,

    pub quality_distribution: BTreeMap<Quality, u64>,

    /// Raw cache hit counter. Despite the name this is a count, not a ratio.
    pub cache_hit_rate: u64,

    /// Cache hits / total requests (0.0-1.0)
    pub cache_hit_ratio: f64,
}
