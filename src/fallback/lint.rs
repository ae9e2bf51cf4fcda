//! Configuration lint for fallback strategies and field mappings.
//!
//! Configuration calls always apply what they are given. This module only
//! reports values likely to degrade resolution (empty language lists, odd
//! codes, zero weights) so they show up in logs.

use crate::fallback::field_mapping::FieldMapping;
use crate::fallback::strategy::FallbackStrategy;
use crate::i18n::LanguageRegistry;
use regex::Regex;
use std::sync::OnceLock;

/// Errors and warnings found in one configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that will make resolution misbehave
    pub errors: Vec<String>,

    /// Suspicious values that may be intentional
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Lint for strategy and field mapping configuration.
pub struct ConfigValidator;

static LANGUAGE_CODE_REGEX: OnceLock<Regex> = OnceLock::new();

impl ConfigValidator {
    fn is_well_formed_code(code: &str) -> bool {
        let regex = LANGUAGE_CODE_REGEX.get_or_init(|| {
            Regex::new(r"^[a-z]{2,3}(-[A-Za-z]{2,4})?$").expect("language code pattern is valid")
        });
        regex.is_match(code)
    }

    fn check_language(report: &mut ValidationReport, role: &str, code: &str) {
        if !Self::is_well_formed_code(code) {
            report
                .errors
                .push(format!("{} language '{}' is not a valid language code", role, code));
        } else if !LanguageRegistry::get().is_known(code) {
            report
                .warnings
                .push(format!("{} language '{}' is not a known language", role, code));
        }
    }

    /// Lint a fallback strategy.
    pub fn validate_strategy(strategy: &FallbackStrategy) -> ValidationReport {
        let mut report = ValidationReport::new();

        if strategy.primary_languages.is_empty() {
            report
                .warnings
                .push("Primary language list is empty".to_string());
        }
        for code in &strategy.primary_languages {
            Self::check_language(&mut report, "Primary", code);
        }
        Self::check_language(&mut report, "Emergency", &strategy.emergency_language);

        if strategy.max_fallback_depth == 0 {
            report
                .warnings
                .push("Max fallback depth is 0; only the requested language will be tried".to_string());
        }

        report
    }

    /// Lint a field mapping.
    pub fn validate_field_mapping(mapping: &FieldMapping) -> ValidationReport {
        let mut report = ValidationReport::new();

        if mapping.is_empty() {
            report
                .warnings
                .push("Field mapping is empty; every payload will score 100%".to_string());
            return report;
        }

        for field in mapping.fields() {
            if field.path.segments().is_empty() {
                report
                    .errors
                    .push(format!("Field '{}' has an empty path", field.name));
            }
            if !field.priority.is_finite() {
                report
                    .errors
                    .push(format!("Field '{}' has a non-finite weight", field.name));
            } else if field.priority <= 0.0 {
                report.warnings.push(format!(
                    "Field '{}' has non-positive weight {}",
                    field.name, field.priority
                ));
            }
        }

        if mapping.total_weight() == 0.0 {
            report
                .errors
                .push("Total field weight is 0; every payload will score 100%".to_string());
        }

        report
    }
}
