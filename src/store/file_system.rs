//! File system content store
//!
//! Layout: `<root>/<category>/<content_id>/<language>.json`

use crate::error::{StoreError, StoreResult};
use crate::fallback::{ContentCategory, LocalizedPayload};
use crate::store::ContentStore;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Reads localized JSON documents from a directory tree.
#[derive(Debug, Clone)]
pub struct FileContentStore {
    root_path: PathBuf,
}

impl FileContentStore {
    pub fn new<P: AsRef<Path>>(root_path: P) -> Self {
        Self {
            root_path: root_path.as_ref().to_path_buf(),
        }
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Path of one localized document, or `None` if a component would escape the root.
    fn document_path(
        &self,
        content_id: &str,
        language: &str,
        category: &ContentCategory,
    ) -> Option<PathBuf> {
        let components = [category.as_str(), content_id, language];
        if components.iter().any(|c| !is_safe_component(c)) {
            return None;
        }
        Some(
            self.root_path
                .join(category.as_str())
                .join(content_id)
                .join(format!("{}.json", language)),
        )
    }
}

fn is_safe_component(component: &str) -> bool {
    !component.is_empty()
        && component != "."
        && component != ".."
        && !component.contains(['/', '\\'])
}

#[async_trait]
impl ContentStore for FileContentStore {
    async fn fetch(
        &self,
        content_id: &str,
        language: &str,
        category: &ContentCategory,
    ) -> StoreResult<Option<LocalizedPayload>> {
        let Some(path) = self.document_path(content_id, language, category) else {
            debug!(
                "Rejected unsafe content path for {}/{}@{}",
                category, content_id, language
            );
            return Ok(None);
        };

        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let payload = serde_json::from_str(&raw)?;
        Ok(Some(payload))
    }
}
