//! Multilingual content fallback resolution.
//!
//! Given a content id, a target language and a category, find the most
//! complete rendering available, borrowing individual fields from other
//! languages when that improves the result. Nothing here fails outward:
//! when no language yields content the caller gets a localized emergency
//! placeholder instead.
//!
//! - `types`: categories, cache keys, quality tiers and the result record
//! - `strategy`: per-category language search order
//! - `field_mapping`: weighted dot-path fields that define completeness
//! - `completeness`: scoring and quality classification
//! - `resolver` / `enhancer`: the search and the field-borrowing pass
//! - `emergency`: the last-resort placeholder
//! - `cache` / `analytics`: resolution memoization and running counters
//! - `lint`: configuration warnings
//! - `engine`: the owned instance that ties it together

mod analytics;
mod cache;
mod completeness;
mod emergency;
mod engine;
mod enhancer;
mod field_mapping;
mod lint;
mod resolver;
mod strategy;
mod types;

pub use analytics::{AnalyticsRecorder, AnalyticsSnapshot};
pub use cache::{
    CacheConfig, CacheStats, CleanupReport, ResolutionCache, DEFAULT_CACHE_TTL,
    DEFAULT_CLEANUP_BATCH, DEFAULT_MAX_ENTRIES,
};
pub use completeness::{classify_quality, completeness, is_value_complete, missing_fields};
pub use emergency::emergency_result;
pub use engine::{ChainValidation, EngineConfig, FallbackEngine};
pub use field_mapping::{
    default_field_mapping, FieldDescriptor, FieldMapping, FieldMappingRegistry, FieldPath,
    FieldWeight,
};
pub use lint::{ConfigValidator, ValidationReport};
pub use resolver::Resolver;
pub use strategy::{default_strategy, FallbackStrategy, StrategyRegistry};
pub use types::{
    ContentCategory, ContentKey, FallbackResult, LocalizedPayload, Quality, EMERGENCY_LANGUAGE,
};
