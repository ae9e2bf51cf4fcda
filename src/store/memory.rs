//! In-memory content store.

use crate::error::{StoreError, StoreResult};
use crate::fallback::{ContentCategory, LocalizedPayload};
use crate::store::ContentStore;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

type Slot = (ContentCategory, String, String);

/// Map-backed store. Languages can be marked as failing to simulate outages.
#[derive(Debug, Default)]
pub struct InMemoryContentStore {
    documents: RwLock<HashMap<Slot, LocalizedPayload>>,
    failing_languages: RwLock<HashSet<String>>,
    fetches: AtomicUsize,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or replace) a payload.
    pub fn insert(
        &self,
        category: ContentCategory,
        content_id: &str,
        language: &str,
        payload: LocalizedPayload,
    ) {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(slot(&category, content_id, language), payload);
    }

    /// Remove a payload, returning it if present.
    pub fn remove(
        &self,
        category: &ContentCategory,
        content_id: &str,
        language: &str,
    ) -> Option<LocalizedPayload> {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&slot(category, content_id, language))
    }

    /// Make every fetch for `language` fail until [`InMemoryContentStore::restore_language`].
    pub fn fail_language(&self, language: &str) {
        self.failing_languages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(language.to_string());
    }

    pub fn restore_language(&self, language: &str) {
        self.failing_languages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(language);
    }

    /// Number of fetches served so far, including failed ones.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

fn slot(category: &ContentCategory, content_id: &str, language: &str) -> Slot {
    (category.clone(), content_id.to_string(), language.to_string())
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn fetch(
        &self,
        content_id: &str,
        language: &str,
        category: &ContentCategory,
    ) -> StoreResult<Option<LocalizedPayload>> {
        self.fetches.fetch_add(1, Ordering::Relaxed);

        let failing = self
            .failing_languages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(language);
        if failing {
            return Err(StoreError::Unavailable(format!(
                "language '{}' is unavailable",
                language
            )));
        }

        Ok(self
            .documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&slot(category, content_id, language))
            .cloned())
    }
}
