//! Emergency fallback: the safe placeholder returned when nothing usable was found.

use crate::fallback::types::{FallbackResult, Quality, EMERGENCY_LANGUAGE};
use crate::i18n::LanguageRegistry;
use chrono::Utc;
use serde_json::json;
use std::collections::BTreeMap;

/// Build the placeholder result for `content_id` in `target_language`.
///
/// `missing_fields` should name every field of the category's mapping.
pub fn emergency_result(
    content_id: &str,
    target_language: &str,
    missing_fields: Vec<String>,
) -> FallbackResult {
    let registry = LanguageRegistry::get();
    let known = registry.get_by_code(target_language);
    let language = known.unwrap_or_else(|| registry.default_language());
    // Name the requested language in the language of the message.
    let language_label = known.map_or(target_language, |config| config.native_name);

    let content = json!({
        "title": language.strings.title,
        "message": language.strings.render_message(content_id, language_label),
        "contentId": content_id,
        "requestedLanguage": target_language,
        "direction": if language.rtl { "rtl" } else { "ltr" },
        "isEmergencyFallback": true,
    });

    FallbackResult {
        content,
        requested_language: target_language.to_string(),
        actual_language: EMERGENCY_LANGUAGE.to_string(),
        fallback_used: true,
        fallback_chain: vec![EMERGENCY_LANGUAGE.to_string()],
        missing_fields,
        completeness: 0,
        quality: Quality::Emergency,
        field_sources: BTreeMap::new(),
        resolved_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emergency_result_shape() {
        let result = emergency_result("story_01", "ml", vec!["title".to_string()]);

        assert_eq!(result.actual_language, EMERGENCY_LANGUAGE);
        assert_eq!(result.fallback_chain, vec![EMERGENCY_LANGUAGE]);
        assert!(result.fallback_used);
        assert_eq!(result.completeness, 0);
        assert_eq!(result.quality, Quality::Emergency);
        assert_eq!(result.missing_fields, vec!["title"]);
        assert!(result.is_emergency());
    }

    #[test]
    fn test_emergency_content_references_id_and_language() {
        let result = emergency_result("story_01", "ml", vec![]);
        let message = result.content["message"].as_str().unwrap();

        assert!(message.contains("story_01"));
        assert!(message.contains("മലയാളം"));
        assert_eq!(result.content["contentId"], "story_01");
        assert_eq!(result.content["requestedLanguage"], "ml");
        assert_eq!(result.content["isEmergencyFallback"], true);
    }

    #[test]
    fn test_emergency_unknown_language_uses_english() {
        let result = emergency_result("act_1", "xx", vec![]);
        assert_eq!(result.content["title"], "Content not available");
        let message = result.content["message"].as_str().unwrap();
        assert!(message.contains("act_1"));
        assert!(message.contains("xx"));
        assert_eq!(result.content["direction"], "ltr");
    }

    #[test]
    fn test_emergency_rtl_direction() {
        let result = emergency_result("act_1", "ar", vec![]);
        assert_eq!(result.content["direction"], "rtl");
        assert_eq!(result.content["title"], "المحتوى غير متوفر");
    }
}
