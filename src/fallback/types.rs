//! Core value types shared by the fallback engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One localized document as handed back by the content store.
pub type LocalizedPayload = serde_json::Value;

/// Sentinel language recorded on emergency results.
pub const EMERGENCY_LANGUAGE: &str = "emergency";

/// Kind of educational content. Each category has its own strategy and field mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentCategory {
    Activity,
    Assessment,
    Lesson,
    Story,
    Ui,
    Other(String),
}

impl ContentCategory {
    /// Lowercase name used in configuration, logs and store paths.
    pub fn as_str(&self) -> &str {
        match self {
            ContentCategory::Activity => "activity",
            ContentCategory::Assessment => "assessment",
            ContentCategory::Lesson => "lesson",
            ContentCategory::Story => "story",
            ContentCategory::Ui => "ui",
            ContentCategory::Other(name) => name,
        }
    }
}

impl From<&str> for ContentCategory {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "activity" => ContentCategory::Activity,
            "assessment" => ContentCategory::Assessment,
            "lesson" => ContentCategory::Lesson,
            "story" => ContentCategory::Story,
            "ui" => ContentCategory::Ui,
            other => ContentCategory::Other(other.to_string()),
        }
    }
}

impl From<String> for ContentCategory {
    fn from(name: String) -> Self {
        ContentCategory::from(name.as_str())
    }
}

impl From<ContentCategory> for String {
    fn from(category: ContentCategory) -> Self {
        category.as_str().to_string()
    }
}

impl FromStr for ContentCategory {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ContentCategory::from(s))
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one localized rendering request, and the cache slot for its result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentKey {
    pub content_id: String,
    pub language: String,
    pub category: ContentCategory,
}

impl ContentKey {
    pub fn new(
        content_id: impl Into<String>,
        language: impl Into<String>,
        category: ContentCategory,
    ) -> Self {
        Self {
            content_id: content_id.into(),
            language: language.into(),
            category,
        }
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.category, self.content_id, self.language)
    }
}

/// How trustworthy a resolved rendering is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Perfect,
    Good,
    Partial,
    Emergency,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Perfect => "perfect",
            Quality::Good => "good",
            Quality::Partial => "partial",
            Quality::Emergency => "emergency",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one resolution. Never mutated after it is returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackResult {
    /// Resolved content (possibly merged from several languages)
    pub content: LocalizedPayload,

    /// Language the caller asked for
    pub requested_language: String,

    /// Language the base payload came from, or [`EMERGENCY_LANGUAGE`]
    pub actual_language: String,

    /// Whether anything other than the requested language was used
    pub fallback_used: bool,

    /// Languages attempted by the search loop, in order
    pub fallback_chain: Vec<String>,

    /// Mapped fields still incomplete in `content`
    pub missing_fields: Vec<String>,

    /// Weighted completeness, 0-100
    pub completeness: u8,

    pub quality: Quality,

    /// Fields borrowed by partial fallback, with the language each came from
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_sources: BTreeMap<String, String>,

    pub resolved_at: DateTime<Utc>,
}

impl FallbackResult {
    pub fn is_emergency(&self) -> bool {
        self.actual_language == EMERGENCY_LANGUAGE
    }
}
