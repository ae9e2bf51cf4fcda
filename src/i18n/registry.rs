//! Language registry: static metadata for every language the platform knows.
//!
//! The registry is read-only reference data, initialized once through
//! `OnceLock`. It does not restrict which codes a fallback strategy may
//! name; unknown codes are only reported by the configuration lint.

use crate::i18n::strings::{
    PlaceholderStrings, ARABIC_STRINGS, ENGLISH_STRINGS, FRENCH_STRINGS, HINDI_STRINGS,
    MALAYALAM_STRINGS, SPANISH_STRINGS, URDU_STRINGS,
};
use std::sync::OnceLock;

/// Metadata for one known language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "ar", "ml")
    pub code: &'static str,

    /// English name of the language (e.g., "Malayalam")
    pub name: &'static str,

    /// Native name of the language (e.g., "മലയാളം")
    pub native_name: &'static str,

    /// Written right-to-left
    pub rtl: bool,

    /// Placeholder strings for emergency screens
    pub strings: PlaceholderStrings,
}

/// Registry of known languages.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    ///
    /// Region suffixes are ignored, so "ar-EG" finds "ar".
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        let base = code.split(['-', '_']).next().unwrap_or(code);
        self.languages
            .iter()
            .find(|lang| lang.code.eq_ignore_ascii_case(base))
    }

    pub fn is_known(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }

    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// English configuration, used whenever a code is unknown.
    pub fn default_language(&self) -> &LanguageConfig {
        self.get_by_code("en").unwrap_or(&self.languages[0])
    }

    /// Placeholder strings for `code`, falling back to English.
    pub fn placeholder_strings(&self, code: &str) -> &PlaceholderStrings {
        &self
            .get_by_code(code)
            .unwrap_or_else(|| self.default_language())
            .strings
    }
}

fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            rtl: false,
            strings: ENGLISH_STRINGS,
        },
        LanguageConfig {
            code: "ar",
            name: "Arabic",
            native_name: "العربية",
            rtl: true,
            strings: ARABIC_STRINGS,
        },
        LanguageConfig {
            code: "hi",
            name: "Hindi",
            native_name: "हिन्दी",
            rtl: false,
            strings: HINDI_STRINGS,
        },
        LanguageConfig {
            code: "ur",
            name: "Urdu",
            native_name: "اردو",
            rtl: true,
            strings: URDU_STRINGS,
        },
        LanguageConfig {
            code: "ml",
            name: "Malayalam",
            native_name: "മലയാളം",
            rtl: false,
            strings: MALAYALAM_STRINGS,
        },
        LanguageConfig {
            code: "es",
            name: "Spanish",
            native_name: "Español",
            rtl: false,
            strings: SPANISH_STRINGS,
        },
        LanguageConfig {
            code: "fr",
            name: "French",
            native_name: "Français",
            rtl: false,
            strings: FRENCH_STRINGS,
        },
    ]
}
