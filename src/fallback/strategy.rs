//! Per-category fallback policy.
//!
//! Every category has a built-in default. Runtime configuration replaces the
//! whole strategy for a category (last write wins); nothing is ever removed.

use crate::fallback::types::ContentCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Fallback policy for one content category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FallbackStrategy {
    /// Preferred fallback languages, in priority order
    pub primary_languages: Vec<String>,

    /// Last-resort language appended after the primary list
    pub emergency_language: String,

    /// Allow borrowing individual fields from other languages
    pub enable_partial_fallback: bool,

    /// Maximum number of languages the search loop may try
    pub max_fallback_depth: usize,

    /// Cache resolutions for this category
    pub cache_results: bool,

    /// Emit per-resolution logs for this category
    pub enable_logging: bool,
}

impl FallbackStrategy {
    /// Ordered, de-duplicated search order: target, primary languages, emergency language.
    ///
    /// Not truncated; see [`FallbackStrategy::search_order`].
    pub fn language_order(&self, target_language: &str) -> Vec<String> {
        let mut order: Vec<String> = Vec::with_capacity(self.primary_languages.len() + 2);
        let candidates = std::iter::once(target_language)
            .chain(self.primary_languages.iter().map(String::as_str))
            .chain(std::iter::once(self.emergency_language.as_str()));

        for language in candidates {
            if !order.iter().any(|seen| seen == language) {
                order.push(language.to_string());
            }
        }
        order
    }

    /// Search order truncated to the maximum fallback depth.
    ///
    /// The requested language is always attempted, so a depth of 0 behaves as 1.
    pub fn search_order(&self, target_language: &str) -> Vec<String> {
        let mut order = self.language_order(target_language);
        order.truncate(self.max_fallback_depth.max(1));
        order
    }

    fn new(primary: &[&str], emergency: &str, partial: bool, depth: usize, cache: bool) -> Self {
        Self {
            primary_languages: primary.iter().map(|l| l.to_string()).collect(),
            emergency_language: emergency.to_string(),
            enable_partial_fallback: partial,
            max_fallback_depth: depth,
            cache_results: cache,
            enable_logging: true,
        }
    }
}

impl Default for FallbackStrategy {
    fn default() -> Self {
        Self::new(&["en"], "en", true, 3, true)
    }
}

/// Built-in strategy for a category.
///
/// Activities get the richest language list; assessments are high-stakes, so
/// they never mix languages and are never cached.
pub fn default_strategy(category: &ContentCategory) -> FallbackStrategy {
    match category {
        ContentCategory::Activity => {
            FallbackStrategy::new(&["en", "ar", "hi", "ur"], "en", true, 5, true)
        }
        ContentCategory::Assessment => FallbackStrategy::new(&["en"], "en", false, 2, false),
        ContentCategory::Lesson => FallbackStrategy::new(&["en", "ar"], "en", true, 4, true),
        ContentCategory::Story => FallbackStrategy::new(&["en", "ar", "hi"], "en", true, 4, true),
        ContentCategory::Ui => FallbackStrategy {
            enable_logging: false,
            ..FallbackStrategy::new(&["en"], "en", true, 2, true)
        },
        ContentCategory::Other(_) => FallbackStrategy::default(),
    }
}

/// Registry of configured strategies, falling back to [`default_strategy`].
#[derive(Debug, Default)]
pub struct StrategyRegistry {
    configured: RwLock<HashMap<ContentCategory, FallbackStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configured strategy for `category`, or its built-in default.
    pub fn get(&self, category: &ContentCategory) -> FallbackStrategy {
        self.configured
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(category)
            .cloned()
            .unwrap_or_else(|| default_strategy(category))
    }

    /// Replace the strategy for `category` unconditionally.
    pub fn configure(&self, category: ContentCategory, strategy: FallbackStrategy) {
        self.configured
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(category, strategy);
    }
}
