//! Error types for content fetching and resolution.
//!
//! None of these ever reach a caller of
//! [`FallbackEngine::resolve_content_with_fallback`](crate::fallback::FallbackEngine::resolve_content_with_fallback):
//! store errors are recovered per language and resolution errors are turned
//! into emergency results at the engine boundary.

use thiserror::Error;

/// Result type alias for content store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors a [`ContentStore`](crate::store::ContentStore) can report for one fetch.
///
/// "Not found" is not an error: stores return `Ok(None)` for it.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error while reading content
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored content is not valid JSON
    #[error("Failed to parse content: {0}")]
    Parse(#[from] serde_json::Error),

    /// Fetch did not complete within the configured timeout
    #[error("Fetch timed out after {millis}ms")]
    Timeout { millis: u128 },

    /// Backend refused or failed the request
    #[error("Content store unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised inside the resolution pipeline.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No language in the search order produced any payload
    #[error("No content found for '{content_id}' after trying {tried:?}")]
    NoContent {
        content_id: String,
        tried: Vec<String>,
    },

    /// The pipeline panicked; the payload message is kept for logging
    #[error("Resolution aborted: {0}")]
    Aborted(String),
}
