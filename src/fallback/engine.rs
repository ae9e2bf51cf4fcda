//! The fallback engine: one owned instance holding registries, cache and analytics.
//!
//! Construct it once at startup and share it by reference (or `Arc`) with
//! every consumer. [`FallbackEngine::resolve_content_with_fallback`] never
//! fails: every error path ends in an emergency placeholder result.

use crate::error::ResolveError;
use crate::fallback::analytics::{AnalyticsRecorder, AnalyticsSnapshot};
use crate::fallback::cache::{CacheConfig, CacheStats, CleanupReport, ResolutionCache};
use crate::fallback::completeness::completeness;
use crate::fallback::emergency::emergency_result;
use crate::fallback::field_mapping::{FieldMapping, FieldMappingRegistry};
use crate::fallback::lint::{ConfigValidator, ValidationReport};
use crate::fallback::resolver::{PayloadFetcher, Resolver};
use crate::fallback::strategy::{FallbackStrategy, StrategyRegistry};
use crate::fallback::types::{ContentCategory, ContentKey, FallbackResult};
use crate::store::ContentStore;
use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Engine-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub cache: CacheConfig,

    /// Upper bound on each individual store fetch
    pub fetch_timeout: Option<Duration>,
}

/// Diagnostic view of which languages exist for one piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainValidation {
    /// At least one language in the chain has content
    pub valid: bool,
    pub available_languages: Vec<String>,
    pub missing_languages: Vec<String>,
    pub completeness_per_language: BTreeMap<String, u8>,
}

/// Multilingual content fallback resolution engine.
pub struct FallbackEngine {
    store: Arc<dyn ContentStore>,
    strategies: StrategyRegistry,
    field_mappings: FieldMappingRegistry,
    cache: ResolutionCache,
    analytics: AnalyticsRecorder,
    fetch_timeout: Option<Duration>,
}

impl FallbackEngine {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: Arc<dyn ContentStore>, config: EngineConfig) -> Self {
        Self {
            store,
            strategies: StrategyRegistry::new(),
            field_mappings: FieldMappingRegistry::new(),
            cache: ResolutionCache::new(config.cache),
            analytics: AnalyticsRecorder::new(),
            fetch_timeout: config.fetch_timeout,
        }
    }

    /// Resolve the most complete rendering of `content_id` for `target_language`.
    ///
    /// `strategy_override` replaces the category's configured strategy for this
    /// call only; it does not change the cache key. A panic anywhere in the call
    /// is caught here and answered with the emergency placeholder.
    pub async fn resolve_content_with_fallback(
        &self,
        content_id: &str,
        target_language: &str,
        category: &ContentCategory,
        strategy_override: Option<&FallbackStrategy>,
    ) -> FallbackResult {
        let started = Instant::now();
        let attempt = self.resolve_or_emergency(
            content_id,
            target_language,
            category,
            strategy_override,
            started,
        );

        match AssertUnwindSafe(attempt).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                let e = ResolveError::Aborted(panic_message(panic.as_ref()));
                error!(
                    "Resolution of {}/{}@{} failed, serving emergency placeholder: {}",
                    category, content_id, target_language, e
                );
                let mapping = self.field_mappings.get(category);
                let result = emergency_result(content_id, target_language, mapping.field_names());
                self.analytics.record_outcome(&result, started.elapsed());
                result
            }
        }
    }

    async fn resolve_or_emergency(
        &self,
        content_id: &str,
        target_language: &str,
        category: &ContentCategory,
        strategy_override: Option<&FallbackStrategy>,
        started: Instant,
    ) -> FallbackResult {
        let key = ContentKey::new(content_id, target_language, category.clone());
        let strategy = match strategy_override {
            Some(strategy) => strategy.clone(),
            None => self.strategies.get(category),
        };

        if strategy.cache_results {
            if let Some(cached) = self.cache.get(&key) {
                if strategy.enable_logging {
                    debug!("Cache hit for {}", key);
                }
                self.analytics.record_cache_hit();
                self.analytics.record_outcome(&cached, started.elapsed());
                return cached;
            }
        }

        let mapping = self.field_mappings.get(category);
        let resolver = Resolver::new(self.store.as_ref(), &strategy, &mapping)
            .with_fetch_timeout(self.fetch_timeout);

        let result = match resolver.resolve(content_id, target_language, category).await {
            Ok(result) => {
                if strategy.cache_results {
                    if let Some(report) = self.cache.insert(key, result.clone()) {
                        debug!(
                            "Cache over capacity, cleanup removed {} entries",
                            report.removed()
                        );
                    }
                }
                result
            }
            Err(e) => {
                if strategy.enable_logging {
                    warn!("Serving emergency placeholder: {}", e);
                }
                emergency_result(content_id, target_language, mapping.field_names())
            }
        };

        self.analytics.record_outcome(&result, started.elapsed());
        result
    }

    /// Replace the fallback strategy for `category`.
    ///
    /// Always applied; lint findings are logged, not enforced.
    pub fn configure_fallback_strategy(&self, category: ContentCategory, strategy: FallbackStrategy) {
        log_report(&category, "strategy", &ConfigValidator::validate_strategy(&strategy));
        info!("Configured fallback strategy for {}", category);
        self.strategies.configure(category, strategy);
    }

    /// Replace the field mapping for `category`.
    ///
    /// Accepts a parsed [`FieldMapping`] or the dot-path weight map it is built from.
    pub fn configure_field_mapping(
        &self,
        category: ContentCategory,
        mapping: impl Into<FieldMapping>,
    ) {
        let mapping = mapping.into();
        log_report(
            &category,
            "field mapping",
            &ConfigValidator::validate_field_mapping(&mapping),
        );
        info!(
            "Configured field mapping for {} ({} fields)",
            category,
            mapping.fields().len()
        );
        self.field_mappings.configure(category, mapping);
    }

    /// Current strategy for `category` (configured or default).
    pub fn fallback_strategy(&self, category: &ContentCategory) -> FallbackStrategy {
        self.strategies.get(category)
    }

    /// Current field mapping for `category` (configured or default).
    pub fn field_mapping(&self, category: &ContentCategory) -> FieldMapping {
        self.field_mappings.get(category)
    }

    pub fn analytics(&self) -> AnalyticsSnapshot {
        self.analytics.snapshot()
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            size: self.cache.len(),
            hit_counter: self.analytics.cache_hits(),
            total_access_count: self.cache.total_access_count(),
        }
    }

    /// Empty the cache. Analytics counters are left untouched.
    pub fn clear_cache(&self) {
        let removed = self.cache.clear();
        info!("Cleared {} cached resolutions", removed);
    }

    /// Run one cleanup pass, as the periodic sweeper does.
    pub fn sweep_cache(&self) -> CleanupReport {
        self.cache.cleanup()
    }

    /// Probe every language in the category's full search order.
    ///
    /// Bypasses the cache and does not touch analytics. Languages whose fetch
    /// fails are reported as missing.
    pub async fn validate_fallback_chain(
        &self,
        content_id: &str,
        target_language: &str,
        category: &ContentCategory,
    ) -> ChainValidation {
        let strategy = self.strategies.get(category);
        let mapping = self.field_mappings.get(category);
        let mut fetcher = PayloadFetcher::new(self.store.as_ref(), self.fetch_timeout, true);

        let mut available_languages = Vec::new();
        let mut missing_languages = Vec::new();
        let mut completeness_per_language = BTreeMap::new();

        for language in strategy.language_order(target_language) {
            match fetcher.fetch(content_id, &language, category).await {
                Some(payload) => {
                    completeness_per_language.insert(language.clone(), completeness(&payload, &mapping));
                    available_languages.push(language);
                }
                None => missing_languages.push(language),
            }
        }

        ChainValidation {
            valid: !available_languages.is_empty(),
            available_languages,
            missing_languages,
            completeness_per_language,
        }
    }
}

fn log_report(category: &ContentCategory, what: &str, report: &ValidationReport) {
    for finding in &report.errors {
        warn!("Invalid {} for {}: {}", what, category, finding);
    }
    for finding in &report.warnings {
        warn!("Suspicious {} for {}: {}", what, category, finding);
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
