use crate::fallback::{
    CacheConfig, ContentCategory, EngineConfig, FallbackEngine, FallbackStrategy, FieldWeight,
    DEFAULT_CACHE_TTL, DEFAULT_CLEANUP_BATCH, DEFAULT_MAX_ENTRIES,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Config {
    // Content store
    pub content_dir: PathBuf,

    // Cache
    pub cache_ttl_secs: u64,
    pub cache_max_entries: usize,
    pub cache_cleanup_batch: usize,
    pub sweep_interval_secs: u64,

    // Store access
    pub fetch_timeout_ms: Option<u64>,

    // Strategy and field mapping overrides (JSON)
    pub overrides_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            content_dir: std::env::var("CONTENT_DIR")
                .unwrap_or_else(|_| "data/content".to_string())
                .into(),

            cache_ttl_secs: std::env::var("FALLBACK_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CACHE_TTL.as_secs()),
            cache_max_entries: std::env::var("FALLBACK_CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_ENTRIES),
            cache_cleanup_batch: std::env::var("FALLBACK_CACHE_CLEANUP_BATCH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CLEANUP_BATCH),
            sweep_interval_secs: std::env::var("FALLBACK_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(600),

            fetch_timeout_ms: match std::env::var("FALLBACK_FETCH_TIMEOUT_MS") {
                Ok(v) => Some(
                    v.parse()
                        .with_context(|| format!("FALLBACK_FETCH_TIMEOUT_MS is not a number: {}", v))?,
                ),
                Err(_) => None,
            },

            overrides_file: std::env::var("FALLBACK_CONFIG_FILE").ok().map(PathBuf::from),
        })
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            cache: CacheConfig {
                ttl: Duration::from_secs(self.cache_ttl_secs),
                max_entries: self.cache_max_entries,
                cleanup_batch: self.cache_cleanup_batch,
            },
            fetch_timeout: self.fetch_timeout_ms.map(Duration::from_millis),
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Per-category strategy and field mapping overrides, as read from JSON.
///
/// ```json
/// {
///   "strategies": { "story": { "primaryLanguages": ["en", "ar"], "maxFallbackDepth": 3 } },
///   "fieldMappings": { "ui": { "label": { "priority": 10, "fallbackEligible": true } } }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigOverrides {
    pub strategies: BTreeMap<ContentCategory, FallbackStrategy>,
    pub field_mappings: BTreeMap<ContentCategory, BTreeMap<String, FieldWeight>>,
}

impl ConfigOverrides {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read overrides file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse overrides file {}", path.display()))
    }

    /// Apply every override through the engine's configuration calls.
    pub fn apply(&self, engine: &FallbackEngine) {
        for (category, strategy) in &self.strategies {
            engine.configure_fallback_strategy(category.clone(), strategy.clone());
        }
        for (category, weights) in &self.field_mappings {
            engine.configure_field_mapping(category.clone(), weights.clone());
        }
        info!(
            "Applied {} strategy and {} field mapping overrides",
            self.strategies.len(),
            self.field_mappings.len()
        );
    }
}
