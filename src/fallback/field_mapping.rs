//! Weighted field descriptors per content category.
//!
//! Mappings are configured with dot-path strings (`"content.steps"`), which are
//! split into [`FieldPath`] segments once, when the mapping is registered.

use crate::fallback::types::{ContentCategory, LocalizedPayload};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{PoisonError, RwLock};

/// Pre-parsed dot path into a JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path
                .split('.')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Value at this path, if every segment resolves.
    ///
    /// Numeric segments index into arrays.
    pub fn resolve<'a>(&self, payload: &'a LocalizedPayload) -> Option<&'a Value> {
        if self.segments.is_empty() {
            return None;
        }
        self.segments
            .iter()
            .try_fold(payload, |current, segment| match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }

    /// Write `value` at this path, creating intermediate objects as needed.
    ///
    /// Returns `false` when an existing non-container value blocks the path.
    pub fn assign(&self, payload: &mut LocalizedPayload, value: Value) -> bool {
        let Some((last, parents)) = self.segments.split_last() else {
            return false;
        };

        let mut current = payload;
        for segment in parents {
            if current.is_null() {
                *current = Value::Object(Map::new());
            }
            current = match current {
                Value::Object(map) => map
                    .entry(segment.clone())
                    .or_insert_with(|| Value::Object(Map::new())),
                Value::Array(items) => match segment.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
                    Some(item) => item,
                    None => return false,
                },
                _ => return false,
            };
        }

        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        match current {
            Value::Object(map) => {
                map.insert(last.clone(), value);
                true
            }
            Value::Array(items) => match last.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
                Some(slot) => {
                    *slot = value;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// External configuration form of one field: weight and fallback eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldWeight {
    pub priority: f64,
    #[serde(default = "eligible_by_default")]
    pub fallback_eligible: bool,
}

fn eligible_by_default() -> bool {
    true
}

impl FieldWeight {
    pub fn new(priority: f64, fallback_eligible: bool) -> Self {
        Self {
            priority,
            fallback_eligible,
        }
    }
}

/// One registered field: its dot-path name, parsed path and weight.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub path: FieldPath,
    pub priority: f64,
    pub fallback_eligible: bool,
}

/// Parsed field mapping for one category, in field-name order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMapping {
    fields: Vec<FieldDescriptor>,
}

impl FieldMapping {
    pub fn from_weights(weights: BTreeMap<String, FieldWeight>) -> Self {
        let fields = weights
            .into_iter()
            .map(|(name, weight)| FieldDescriptor {
                path: FieldPath::parse(&name),
                name,
                priority: weight.priority,
                fallback_eligible: weight.fallback_eligible,
            })
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn total_weight(&self) -> f64 {
        self.fields.iter().map(|f| f.priority).sum()
    }

    /// Back to the external dot-path form.
    pub fn to_weights(&self) -> BTreeMap<String, FieldWeight> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), FieldWeight::new(f.priority, f.fallback_eligible)))
            .collect()
    }
}

impl From<BTreeMap<String, FieldWeight>> for FieldMapping {
    fn from(weights: BTreeMap<String, FieldWeight>) -> Self {
        Self::from_weights(weights)
    }
}

fn mapping(fields: &[(&str, f64, bool)]) -> FieldMapping {
    FieldMapping::from_weights(
        fields
            .iter()
            .map(|(name, priority, eligible)| (name.to_string(), FieldWeight::new(*priority, *eligible)))
            .collect(),
    )
}

/// Built-in field mapping for a category.
pub fn default_field_mapping(category: &ContentCategory) -> FieldMapping {
    match category {
        ContentCategory::Activity => mapping(&[
            ("title", 10.0, true),
            ("description", 8.0, true),
            ("instructions", 9.0, true),
            ("content.steps", 7.0, true),
            ("content.materials", 4.0, true),
            ("metadata.ageGroup", 2.0, false),
        ]),
        // Questions must come from a single language.
        ContentCategory::Assessment => mapping(&[
            ("title", 10.0, true),
            ("instructions", 8.0, true),
            ("questions", 10.0, false),
            ("rubric", 5.0, false),
        ]),
        ContentCategory::Lesson => mapping(&[
            ("title", 10.0, true),
            ("objectives", 6.0, true),
            ("content.body", 10.0, true),
            ("summary", 4.0, true),
        ]),
        ContentCategory::Story => mapping(&[
            ("title", 10.0, true),
            ("content.pages", 10.0, true),
            ("author", 2.0, false),
            ("moral", 3.0, true),
        ]),
        ContentCategory::Ui => mapping(&[("label", 10.0, true), ("tooltip", 3.0, true)]),
        ContentCategory::Other(_) => mapping(&[("title", 10.0, true), ("description", 5.0, true)]),
    }
}

/// Registry of configured field mappings, falling back to [`default_field_mapping`].
#[derive(Debug, Default)]
pub struct FieldMappingRegistry {
    configured: RwLock<HashMap<ContentCategory, FieldMapping>>,
}

impl FieldMappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: &ContentCategory) -> FieldMapping {
        self.configured
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(category)
            .cloned()
            .unwrap_or_else(|| default_field_mapping(category))
    }

    pub fn configure(&self, category: ContentCategory, mapping: FieldMapping) {
        self.configured
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(category, mapping);
    }
}
