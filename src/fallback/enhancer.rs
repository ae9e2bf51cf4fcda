//! Partial fallback: fill incomplete fields of the best candidate from other languages.

use crate::fallback::completeness::{completeness, is_field_complete, is_value_complete};
use crate::fallback::field_mapping::FieldMapping;
use crate::fallback::resolver::{Candidate, PayloadFetcher};
use crate::fallback::strategy::FallbackStrategy;
use crate::fallback::types::{ContentCategory, LocalizedPayload};
use std::collections::BTreeMap;
use tracing::debug;

/// Candidate content after field borrowing.
#[derive(Debug, Clone)]
pub(crate) struct Enhancement {
    pub content: LocalizedPayload,
    pub completeness: u8,
    /// Borrowed field name -> source language
    pub field_sources: BTreeMap<String, String>,
}

/// Borrow each incomplete, fallback-eligible field from the first primary
/// language (other than the candidate's own) where that field is complete.
///
/// Donors are limited to `searched`, the depth-capped search order, so a
/// language beyond the cap never contributes. Only the field's value is
/// copied. The caller decides whether to adopt the result; this function
/// never modifies `candidate`.
pub(crate) async fn enhance(
    fetcher: &mut PayloadFetcher<'_>,
    content_id: &str,
    category: &ContentCategory,
    candidate: &Candidate,
    searched: &[String],
    strategy: &FallbackStrategy,
    mapping: &FieldMapping,
) -> Enhancement {
    let mut content = candidate.content.clone();
    let mut field_sources = BTreeMap::new();

    let incomplete: Vec<_> = mapping
        .fields()
        .iter()
        .filter(|field| field.fallback_eligible && !is_field_complete(&content, field))
        .collect();

    for field in incomplete {
        let donors = strategy
            .primary_languages
            .iter()
            .filter(|language| {
                **language != candidate.language && searched.contains(*language)
            });

        for language in donors {
            let Some(donor) = fetcher.fetch(content_id, language, category).await else {
                continue;
            };
            let Some(value) = field.path.resolve(&donor) else {
                continue;
            };
            if !is_value_complete(Some(value)) {
                continue;
            }

            if field.path.assign(&mut content, value.clone()) {
                debug!(
                    "Borrowed field '{}' for {}/{} from {}",
                    field.name, category, content_id, language
                );
                field_sources.insert(field.name.clone(), language.clone());
            }
            break;
        }
    }

    Enhancement {
        completeness: completeness(&content, mapping),
        content,
        field_sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::field_mapping::FieldWeight;
    use crate::store::InMemoryContentStore;
    use serde_json::json;

    const CAT: ContentCategory = ContentCategory::Lesson;

    fn mapping() -> FieldMapping {
        FieldMapping::from_weights(BTreeMap::from([
            ("title".to_string(), FieldWeight::new(4.0, true)),
            ("content.body".to_string(), FieldWeight::new(4.0, true)),
            ("questions".to_string(), FieldWeight::new(2.0, false)),
        ]))
    }

    fn strategy(primary: &[&str]) -> FallbackStrategy {
        FallbackStrategy {
            primary_languages: primary.iter().map(|l| l.to_string()).collect(),
            ..FallbackStrategy::default()
        }
    }

    fn searched(languages: &[&str]) -> Vec<String> {
        languages.iter().map(|l| l.to_string()).collect()
    }

    fn candidate(content: LocalizedPayload, language: &str) -> Candidate {
        Candidate {
            completeness: completeness(&content, &mapping()),
            content,
            language: language.to_string(),
        }
    }

    #[tokio::test]
    async fn test_borrows_only_missing_field() {
        let store = InMemoryContentStore::new();
        store.insert(
            CAT,
            "l1",
            "en",
            json!({"title": "English title", "content": {"body": "English body"}}),
        );
        let base = candidate(json!({"title": "عنوان", "questions": [1]}), "ar");
        let mut fetcher = PayloadFetcher::new(&store, None, false);

        let enhanced = enhance(
            &mut fetcher,
            "l1",
            &CAT,
            &base,
            &searched(&["ar", "en"]),
            &strategy(&["en"]),
            &mapping(),
        )
        .await;

        assert_eq!(enhanced.content["title"], "عنوان");
        assert_eq!(enhanced.content["content"]["body"], "English body");
        assert_eq!(enhanced.completeness, 100);
        assert_eq!(enhanced.field_sources.len(), 1);
        assert_eq!(enhanced.field_sources["content.body"], "en");
        assert_eq!(base.completeness, 60);
    }

    #[tokio::test]
    async fn test_first_donor_with_complete_field_wins() {
        let store = InMemoryContentStore::new();
        store.insert(CAT, "l1", "en", json!({"content": {"body": "  "}}));
        store.insert(CAT, "l1", "hi", json!({"content": {"body": "हिंदी"}}));
        store.insert(CAT, "l1", "fr", json!({"content": {"body": "Français"}}));
        let base = candidate(json!({"title": "T"}), "ml");
        let mut fetcher = PayloadFetcher::new(&store, None, false);

        let enhanced = enhance(
            &mut fetcher,
            "l1",
            &CAT,
            &base,
            &searched(&["ml", "en", "hi", "fr"]),
            &strategy(&["en", "hi", "fr"]),
            &mapping(),
        )
        .await;

        assert_eq!(enhanced.content["content"]["body"], "हिंदी");
        assert_eq!(enhanced.field_sources["content.body"], "hi");
    }

    #[tokio::test]
    async fn test_ineligible_fields_are_not_borrowed() {
        let store = InMemoryContentStore::new();
        store.insert(CAT, "l1", "en", json!({"questions": ["Q1"]}));
        let base = candidate(json!({"title": "T", "content": {"body": "B"}}), "ml");
        let mut fetcher = PayloadFetcher::new(&store, None, false);

        let enhanced = enhance(
            &mut fetcher,
            "l1",
            &CAT,
            &base,
            &searched(&["ml", "en"]),
            &strategy(&["en"]),
            &mapping(),
        )
        .await;

        assert!(enhanced.content.get("questions").is_none());
        assert_eq!(enhanced.completeness, base.completeness);
        assert!(enhanced.field_sources.is_empty());
    }

    #[tokio::test]
    async fn test_base_language_is_not_a_donor() {
        let store = InMemoryContentStore::new();
        store.insert(CAT, "l1", "en", json!({"title": "T", "content": {"body": "B"}}));
        let base = candidate(json!({"title": "T"}), "en");
        let mut fetcher = PayloadFetcher::new(&store, None, false);

        let enhanced = enhance(
            &mut fetcher,
            "l1",
            &CAT,
            &base,
            &searched(&["en"]),
            &strategy(&["en"]),
            &mapping(),
        )
        .await;

        assert!(enhanced.field_sources.is_empty());
        assert_eq!(store.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_unresolved_field_stays_missing() {
        let store = InMemoryContentStore::new();
        let base = candidate(json!({"title": "T"}), "ml");
        let mut fetcher = PayloadFetcher::new(&store, None, false);

        let enhanced = enhance(
            &mut fetcher,
            "l1",
            &CAT,
            &base,
            &searched(&["ml", "en", "ar"]),
            &strategy(&["en", "ar"]),
            &mapping(),
        )
        .await;

        assert_eq!(enhanced.content, json!({"title": "T"}));
        assert_eq!(enhanced.completeness, base.completeness);
    }

    #[tokio::test]
    async fn test_languages_past_depth_cap_are_not_donors() {
        let store = InMemoryContentStore::new();
        store.insert(CAT, "l1", "hi", json!({"title": "T", "content": {"body": "हिंदी"}}));
        let base = candidate(json!({"title": "T"}), "en");
        let mut fetcher = PayloadFetcher::new(&store, None, false);

        let enhanced = enhance(
            &mut fetcher,
            "l1",
            &CAT,
            &base,
            &searched(&["ml", "en"]),
            &strategy(&["en", "ar", "hi"]),
            &mapping(),
        )
        .await;

        assert!(enhanced.field_sources.is_empty());
        assert_eq!(enhanced.completeness, base.completeness);
        assert_eq!(store.fetch_count(), 0);
    }
}
