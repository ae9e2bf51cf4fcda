//! Language search loop.
//!
//! Languages are fetched one at a time, in priority order, so a complete
//! payload early in the order stops the search before later fetches happen.

use crate::error::{ResolveError, StoreError, StoreResult};
use crate::fallback::completeness::{classify_quality, completeness, missing_fields};
use crate::fallback::enhancer::enhance;
use crate::fallback::field_mapping::FieldMapping;
use crate::fallback::strategy::FallbackStrategy;
use crate::fallback::types::{ContentCategory, FallbackResult, LocalizedPayload};
use crate::store::ContentStore;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fetches payloads for one resolution, remembering each language's answer.
///
/// Failed fetches are remembered as "not found" so the same language is never
/// asked twice within one resolution.
pub(crate) struct PayloadFetcher<'a> {
    store: &'a dyn ContentStore,
    timeout: Option<Duration>,
    log: bool,
    fetched: HashMap<String, Option<LocalizedPayload>>,
}

impl<'a> PayloadFetcher<'a> {
    pub(crate) fn new(store: &'a dyn ContentStore, timeout: Option<Duration>, log: bool) -> Self {
        Self {
            store,
            timeout,
            log,
            fetched: HashMap::new(),
        }
    }

    async fn fetch_from_store(
        &self,
        content_id: &str,
        language: &str,
        category: &ContentCategory,
    ) -> StoreResult<Option<LocalizedPayload>> {
        let fetch = self.store.fetch(content_id, language, category);
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .map_err(|_| StoreError::Timeout {
                    millis: limit.as_millis(),
                })?,
            None => fetch.await,
        }
    }

    /// Payload for `language`, or `None` if it is missing or the fetch failed.
    pub(crate) async fn fetch(
        &mut self,
        content_id: &str,
        language: &str,
        category: &ContentCategory,
    ) -> Option<LocalizedPayload> {
        if let Some(known) = self.fetched.get(language) {
            return known.clone();
        }

        let payload = match self.fetch_from_store(content_id, language, category).await {
            Ok(payload) => payload,
            Err(e) => {
                if self.log {
                    warn!(
                        "Fetch failed for {}/{}@{}, treating as not found: {}",
                        category, content_id, language, e
                    );
                }
                None
            }
        };

        self.fetched.insert(language.to_string(), payload.clone());
        payload
    }
}

/// Best payload seen so far in the search.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub content: LocalizedPayload,
    pub language: String,
    pub completeness: u8,
}

/// Runs the search loop for one request under a fixed strategy and mapping.
pub struct Resolver<'a> {
    store: &'a dyn ContentStore,
    strategy: &'a FallbackStrategy,
    mapping: &'a FieldMapping,
    fetch_timeout: Option<Duration>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        store: &'a dyn ContentStore,
        strategy: &'a FallbackStrategy,
        mapping: &'a FieldMapping,
    ) -> Self {
        Self {
            store,
            strategy,
            mapping,
            fetch_timeout: None,
        }
    }

    /// Bound each individual store fetch.
    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Resolve the best rendering of `content_id` for `target_language`.
    ///
    /// # Returns
    /// * `Ok(FallbackResult)` for any real content, complete or not
    /// * `Err(ResolveError::NoContent)` if no language in the search order had a payload
    pub async fn resolve(
        &self,
        content_id: &str,
        target_language: &str,
        category: &ContentCategory,
    ) -> Result<FallbackResult, ResolveError> {
        let log = self.strategy.enable_logging;
        let order = self.strategy.search_order(target_language);
        let mut fetcher = PayloadFetcher::new(self.store, self.fetch_timeout, log);
        let mut chain: Vec<String> = Vec::with_capacity(order.len());
        let mut best: Option<Candidate> = None;

        for language in &order {
            chain.push(language.clone());

            let Some(payload) = fetcher.fetch(content_id, language, category).await else {
                if log {
                    debug!("No {} payload for {}/{}", language, category, content_id);
                }
                continue;
            };

            let score = completeness(&payload, self.mapping);
            if log {
                debug!(
                    "{}/{}@{} is {}% complete",
                    category, content_id, language, score
                );
            }

            if score == 100 {
                let candidate = Candidate {
                    content: payload,
                    language: language.clone(),
                    completeness: score,
                };
                return Ok(self.assemble(target_language, candidate, chain, BTreeMap::new()));
            }

            if best.as_ref().map_or(true, |b| score > b.completeness) {
                best = Some(Candidate {
                    content: payload,
                    language: language.clone(),
                    completeness: score,
                });
            }
        }

        let Some(mut candidate) = best else {
            return Err(ResolveError::NoContent {
                content_id: content_id.to_string(),
                tried: chain,
            });
        };

        let mut field_sources = BTreeMap::new();
        if self.strategy.enable_partial_fallback {
            let enhanced = enhance(
                &mut fetcher,
                content_id,
                category,
                &candidate,
                &order,
                self.strategy,
                self.mapping,
            )
            .await;

            // Ties keep the single-language candidate.
            if enhanced.completeness > candidate.completeness {
                if log {
                    info!(
                        "Partial fallback raised {}/{} from {}% to {}% using {:?}",
                        category,
                        content_id,
                        candidate.completeness,
                        enhanced.completeness,
                        enhanced.field_sources
                    );
                }
                candidate.content = enhanced.content;
                candidate.completeness = enhanced.completeness;
                field_sources = enhanced.field_sources;
            }
        }

        Ok(self.assemble(target_language, candidate, chain, field_sources))
    }

    fn assemble(
        &self,
        target_language: &str,
        candidate: Candidate,
        chain: Vec<String>,
        field_sources: BTreeMap<String, String>,
    ) -> FallbackResult {
        let quality = classify_quality(candidate.completeness, chain.len());
        let fallback_used = candidate.language != target_language || !field_sources.is_empty();

        if fallback_used && self.strategy.enable_logging {
            info!(
                "Resolved {} with fallback: base={} chain={:?} completeness={}% quality={}",
                target_language, candidate.language, chain, candidate.completeness, quality
            );
        }

        FallbackResult {
            missing_fields: missing_fields(&candidate.content, self.mapping),
            content: candidate.content,
            requested_language: target_language.to_string(),
            actual_language: candidate.language,
            fallback_used,
            fallback_chain: chain,
            completeness: candidate.completeness,
            quality,
            field_sources,
            resolved_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::field_mapping::FieldWeight;
    use crate::fallback::types::Quality;
    use crate::store::InMemoryContentStore;
    use async_trait::async_trait;
    use serde_json::json;

    const CAT: ContentCategory = ContentCategory::Activity;

    fn mapping() -> FieldMapping {
        FieldMapping::from_weights(BTreeMap::from([
            ("title".to_string(), FieldWeight::new(5.0, true)),
            ("body".to_string(), FieldWeight::new(5.0, true)),
        ]))
    }

    fn strategy(primary: &[&str], emergency: &str, depth: usize, partial: bool) -> FallbackStrategy {
        FallbackStrategy {
            primary_languages: primary.iter().map(|l| l.to_string()).collect(),
            emergency_language: emergency.to_string(),
            enable_partial_fallback: partial,
            max_fallback_depth: depth,
            cache_results: true,
            enable_logging: true,
        }
    }

    fn full() -> LocalizedPayload {
        json!({"title": "Title", "body": "Body"})
    }

    #[tokio::test]
    async fn test_exact_language_complete_is_perfect() {
        let store = InMemoryContentStore::new();
        store.insert(CAT, "a1", "ml", full());
        let (s, m) = (strategy(&["en"], "en", 3, true), mapping());

        let result = Resolver::new(&store, &s, &m).resolve("a1", "ml", &CAT).await.unwrap();

        assert_eq!(result.quality, Quality::Perfect);
        assert!(!result.fallback_used);
        assert_eq!(result.fallback_chain, vec!["ml"]);
        assert_eq!(result.completeness, 100);
        assert!(result.missing_fields.is_empty());
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_short_circuits_at_second_language() {
        let store = InMemoryContentStore::new();
        store.insert(CAT, "story_01", "en", full());
        let (s, m) = (strategy(&["en", "ar"], "en", 5, true), mapping());

        let result = Resolver::new(&store, &s, &m)
            .resolve("story_01", "ml", &CAT)
            .await
            .unwrap();

        assert_eq!(result.fallback_chain, vec!["ml", "en"]);
        assert_eq!(result.actual_language, "en");
        assert_eq!(result.quality, Quality::Good);
        assert!(result.fallback_used);
        assert_eq!(store.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_depth_cap_never_reaches_later_language() {
        let store = InMemoryContentStore::new();
        store.insert(CAT, "a1", "hi", full());
        let (s, m) = (strategy(&["en", "ar", "hi"], "en", 2, true), mapping());

        let result = Resolver::new(&store, &s, &m).resolve("a1", "ml", &CAT).await;

        match result {
            Err(ResolveError::NoContent { tried, .. }) => assert_eq!(tried, vec!["ml", "en"]),
            other => panic!("expected NoContent, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_best_partial_candidate_wins() {
        let store = InMemoryContentStore::new();
        store.insert(CAT, "a1", "ml", json!({"title": "", "body": ""}));
        store.insert(CAT, "a1", "en", json!({"title": "T", "body": ""}));
        let (s, m) = (strategy(&["en"], "en", 3, false), mapping());

        let result = Resolver::new(&store, &s, &m).resolve("a1", "ml", &CAT).await.unwrap();

        assert_eq!(result.actual_language, "en");
        assert_eq!(result.completeness, 50);
        assert_eq!(result.missing_fields, vec!["body"]);
        assert_eq!(result.quality, Quality::Emergency);
        assert!(result.field_sources.is_empty());
    }

    #[tokio::test]
    async fn test_equal_scores_keep_first_language() {
        let store = InMemoryContentStore::new();
        store.insert(CAT, "a1", "ml", json!({"title": "T"}));
        store.insert(CAT, "a1", "en", json!({"body": "B"}));
        let (s, m) = (strategy(&["en"], "en", 3, false), mapping());

        let result = Resolver::new(&store, &s, &m).resolve("a1", "ml", &CAT).await.unwrap();
        assert_eq!(result.actual_language, "ml");
        assert!(!result.fallback_used);
    }

    #[tokio::test]
    async fn test_partial_fallback_merges_fields() {
        let store = InMemoryContentStore::new();
        store.insert(CAT, "a1", "ml", json!({"title": "ശീർഷകം", "body": ""}));
        store.insert(CAT, "a1", "en", json!({"title": "", "body": "Body"}));
        let (s, m) = (strategy(&["en"], "en", 2, true), mapping());

        let result = Resolver::new(&store, &s, &m).resolve("a1", "ml", &CAT).await.unwrap();

        assert_eq!(result.actual_language, "ml");
        assert_eq!(result.completeness, 100);
        assert_eq!(result.content["title"], "ശീർഷകം");
        assert_eq!(result.content["body"], "Body");
        assert_eq!(result.field_sources["body"], "en");
        assert_eq!(result.fallback_chain, vec!["ml", "en"]);
        assert!(result.fallback_used);
        assert!(result.missing_fields.is_empty());
        assert_eq!(result.quality, Quality::Good);
        assert_eq!(store.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_partial_fallback_stays_within_depth_cap() {
        let store = InMemoryContentStore::new();
        store.insert(CAT, "a1", "en", json!({"title": "Only a title"}));
        store.insert(CAT, "a1", "hi", full());
        let (s, m) = (strategy(&["en", "ar", "hi"], "en", 2, true), mapping());

        let result = Resolver::new(&store, &s, &m).resolve("a1", "ml", &CAT).await.unwrap();

        assert_eq!(result.fallback_chain, vec!["ml", "en"]);
        assert_eq!(result.actual_language, "en");
        assert_eq!(result.completeness, 50);
        assert!(result.field_sources.is_empty());
        assert_eq!(result.missing_fields, vec!["body"]);
        assert_eq!(store.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_nearly_complete_payload_keeps_searching() {
        let store = InMemoryContentStore::new();
        store.insert(CAT, "b1", "ml", json!({"label": "തുടങ്ങുക"}));
        store.insert(CAT, "b1", "en", json!({"label": "Start", "tooltip": "Begin"}));
        let s = strategy(&["en"], "en", 3, true);
        let m = FieldMapping::from_weights(BTreeMap::from([
            ("label".to_string(), FieldWeight::new(199.0, true)),
            ("tooltip".to_string(), FieldWeight::new(1.0, true)),
        ]));

        let result = Resolver::new(&store, &s, &m).resolve("b1", "ml", &CAT).await.unwrap();

        assert_eq!(result.fallback_chain, vec!["ml", "en"]);
        assert_eq!(result.actual_language, "en");
        assert_eq!(result.completeness, 100);
        assert_eq!(result.quality, Quality::Good);
        assert!(result.missing_fields.is_empty());
    }

    #[tokio::test]
    async fn test_enhancement_tie_keeps_single_language_candidate() {
        let store = InMemoryContentStore::new();
        store.insert(CAT, "a1", "ml", json!({"title": "T"}));
        store.insert(CAT, "a1", "en", json!({"tags": ["nature"]}));
        let s = strategy(&["en"], "en", 3, true);
        // Borrowing "tags" moves the ratio by far less than one point.
        let m = FieldMapping::from_weights(BTreeMap::from([
            ("title".to_string(), FieldWeight::new(5.0, true)),
            ("body".to_string(), FieldWeight::new(5.0, true)),
            ("tags".to_string(), FieldWeight::new(0.001, true)),
        ]));

        let result = Resolver::new(&store, &s, &m).resolve("a1", "ml", &CAT).await.unwrap();

        assert_eq!(result.actual_language, "ml");
        assert_eq!(result.completeness, 50);
        assert_eq!(result.content, json!({"title": "T"}));
        assert!(result.field_sources.is_empty());
        assert!(!result.fallback_used);
        assert_eq!(result.missing_fields, vec!["body", "tags"]);
    }

    #[tokio::test]
    async fn test_fetch_errors_are_skipped() {
        let store = InMemoryContentStore::new();
        store.insert(CAT, "a1", "en", full());
        store.fail_language("ml");
        let (s, m) = (strategy(&["en"], "en", 3, true), mapping());

        let result = Resolver::new(&store, &s, &m).resolve("a1", "ml", &CAT).await.unwrap();
        assert_eq!(result.actual_language, "en");
        assert_eq!(result.fallback_chain, vec!["ml", "en"]);
    }

    #[tokio::test]
    async fn test_all_fetches_fail_is_no_content() {
        let store = InMemoryContentStore::new();
        store.fail_language("ml");
        store.fail_language("en");
        let (s, m) = (strategy(&["en"], "en", 3, true), mapping());

        let result = Resolver::new(&store, &s, &m).resolve("a1", "ml", &CAT).await;
        assert!(matches!(result, Err(ResolveError::NoContent { .. })));
    }

    struct SlowStore;

    #[async_trait]
    impl ContentStore for SlowStore {
        async fn fetch(
            &self,
            _content_id: &str,
            _language: &str,
            _category: &ContentCategory,
        ) -> StoreResult<Option<LocalizedPayload>> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(Some(full()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_timeout_counts_as_failure() {
        let (s, m) = (strategy(&["en"], "en", 2, true), mapping());
        let result = Resolver::new(&SlowStore, &s, &m)
            .with_fetch_timeout(Some(Duration::from_millis(100)))
            .resolve("a1", "ml", &CAT)
            .await;

        match result {
            Err(ResolveError::NoContent { tried, .. }) => assert_eq!(tried, vec!["ml", "en"]),
            other => panic!("expected NoContent, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetcher_memoizes_languages() {
        let store = InMemoryContentStore::new();
        store.insert(CAT, "a1", "en", full());
        let mut fetcher = PayloadFetcher::new(&store, None, false);

        assert!(fetcher.fetch("a1", "en", &CAT).await.is_some());
        assert!(fetcher.fetch("a1", "en", &CAT).await.is_some());
        assert!(fetcher.fetch("a1", "ml", &CAT).await.is_none());
        assert!(fetcher.fetch("a1", "ml", &CAT).await.is_none());
        assert_eq!(store.fetch_count(), 2);
    }
}
