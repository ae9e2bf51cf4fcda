//! Content store interface consumed by the fallback engine.
//!
//! The engine never persists content; it only fetches one localized payload
//! per `(content_id, language, category)` and treats it as read-only.
//!
//! - [`InMemoryContentStore`]: map-backed store for tests and seeding
//! - [`FileContentStore`]: JSON documents laid out on disk

mod file_system;
mod memory;

pub use file_system::FileContentStore;
pub use memory::InMemoryContentStore;

use crate::error::StoreResult;
use crate::fallback::{ContentCategory, LocalizedPayload};
use async_trait::async_trait;

/// Source of localized payloads.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch one localized payload.
    ///
    /// # Returns
    /// * `Ok(Some(payload))` if the content exists in `language`
    /// * `Ok(None)` if it does not
    /// * `Err` if the store could not answer
    async fn fetch(
        &self,
        content_id: &str,
        language: &str,
        category: &ContentCategory,
    ) -> StoreResult<Option<LocalizedPayload>>;
}
