//! Completeness scoring and quality classification.

use crate::fallback::field_mapping::{FieldDescriptor, FieldMapping};
use crate::fallback::types::{LocalizedPayload, Quality};
use serde_json::Value;

/// Whether a value counts as present and meaningful.
///
/// Null is absent; strings must be non-blank after trimming; arrays and
/// objects must be non-empty. Numbers and booleans always count.
pub fn is_value_complete(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Bool(_)) | Some(Value::Number(_)) => true,
    }
}

pub fn is_field_complete(payload: &LocalizedPayload, field: &FieldDescriptor) -> bool {
    is_value_complete(field.path.resolve(payload))
}

/// Weighted completeness percentage of `payload`, always within 0..=100.
///
/// A mapping without positive total weight requires nothing and scores 100.
/// Otherwise 100 is reserved for payloads with every mapped field complete;
/// a ratio that merely rounds up to 100 scores 99.
pub fn completeness(payload: &LocalizedPayload, mapping: &FieldMapping) -> u8 {
    let total = mapping.total_weight();
    if !total.is_finite() || total <= 0.0 {
        return 100;
    }

    let mut complete = 0.0;
    let mut all_complete = true;
    for field in mapping.fields() {
        if is_field_complete(payload, field) {
            complete += field.priority;
        } else {
            all_complete = false;
        }
    }

    let ratio = (complete / total * 100.0).clamp(0.0, 100.0);
    if ratio.is_nan() {
        return 0;
    }
    let score = ratio.round() as u8;
    if score == 100 && !all_complete {
        99
    } else {
        score
    }
}

/// Names of the mapped fields that are not complete in `payload`.
pub fn missing_fields(payload: &LocalizedPayload, mapping: &FieldMapping) -> Vec<String> {
    mapping
        .fields()
        .iter()
        .filter(|field| !is_field_complete(payload, field))
        .map(|field| field.name.clone())
        .collect()
}

/// Quality from final completeness and the number of languages tried.
pub fn classify_quality(completeness: u8, depth: usize) -> Quality {
    if completeness >= 100 && depth <= 1 {
        Quality::Perfect
    } else if completeness >= 90 && depth <= 2 {
        Quality::Good
    } else if completeness >= 60 {
        Quality::Partial
    } else {
        Quality::Emergency
    }
}
