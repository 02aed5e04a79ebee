// src/schema.rs
//! Declarative article schema + validator.
//!
//! The schema file is a small JSON-Schema-like document:
//! `{"required": [...], "properties": {"field": {"type": "string", "minWords": 150, ...}}}`.
//! Patterns are compiled once in [`Schema::from_json_str`]; validation itself is pure.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

/// Primitive JSON types a property may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

impl FieldType {
    fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Object => value.is_object(),
            FieldType::Array => value.is_array(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Object => "object",
            FieldType::Array => "array",
        };
        f.write_str(s)
    }
}

/// Constraints for one property. All optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub kind: Option<FieldType>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min_words: Option<usize>,
    pub max_words: Option<usize>,
    pub pattern: Option<String>,
    #[serde(rename = "enum")]
    pub allowed: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct SchemaDoc {
    #[serde(default)]
    required: Vec<String>,
    #[serde(default)]
    properties: BTreeMap<String, FieldSpec>,
}

/// Immutable, loaded-once schema.
#[derive(Debug, Clone)]
pub struct Schema {
    required: Vec<String>,
    properties: BTreeMap<String, FieldSpec>,
    patterns: HashMap<String, Regex>,
}

impl Schema {
    /// Parse the schema document and compile its patterns (anchored at both ends).
    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        let doc: SchemaDoc = serde_json::from_str(s)?;
        let mut patterns = HashMap::new();
        for (name, spec) in &doc.properties {
            if let Some(p) = &spec.pattern {
                let re = Regex::new(&format!("^(?:{p})$"))
                    .map_err(|e| anyhow::anyhow!("invalid pattern for field '{name}': {e}"))?;
                patterns.insert(name.clone(), re);
            }
        }
        Ok(Self {
            required: doc.required,
            properties: doc.properties,
            patterns,
        })
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn property(&self, name: &str) -> Option<&FieldSpec> {
        self.properties.get(name)
    }

    /// String values of a property's `enum`, if declared.
    pub fn enum_strings(&self, name: &str) -> Option<Vec<String>> {
        let allowed = self.property(name)?.allowed.as_ref()?;
        Some(
            allowed
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        )
    }

    /// `(minWords, maxWords)` of a property, if either is declared.
    pub fn word_bounds(&self, name: &str) -> Option<(Option<usize>, Option<usize>)> {
        let spec = self.property(name)?;
        if spec.min_words.is_none() && spec.max_words.is_none() {
            return None;
        }
        Some((spec.min_words, spec.max_words))
    }
}

/// Which constraint a field broke.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("required field is missing")]
    Missing,
    #[error("must be of type {expected}")]
    WrongType { expected: FieldType },
    #[error("shorter than minLength {min} (got {actual})")]
    MinLength { min: usize, actual: usize },
    #[error("longer than maxLength {max} (got {actual})")]
    MaxLength { max: usize, actual: usize },
    #[error("needs at least {min} words (got {actual})")]
    MinWords { min: usize, actual: usize },
    #[error("allows at most {max} words (got {actual})")]
    MaxWords { max: usize, actual: usize },
    #[error("does not match pattern '{pattern}'")]
    Pattern { pattern: String },
    #[error("value is not one of {allowed}")]
    NotInEnum { allowed: String },
    #[error("field is not declared in the schema")]
    Unexpected,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field '{field}': {kind}")]
pub struct SchemaViolation {
    pub field: String,
    pub kind: Violation,
}

impl SchemaViolation {
    pub fn new(field: impl Into<String>, kind: Violation) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

/// Validate `record` against `schema`; first violation wins.
///
/// Order: required presence, then per-property constraints, then undeclared fields.
pub fn validate(record: &Value, schema: &Schema) -> Result<(), SchemaViolation> {
    let obj = record
        .as_object()
        .ok_or_else(|| SchemaViolation::new("$", Violation::NotAnObject))?;

    for field in &schema.required {
        if !obj.contains_key(field) {
            return Err(SchemaViolation::new(field, Violation::Missing));
        }
    }

    for (name, spec) in &schema.properties {
        let Some(value) = obj.get(name) else {
            continue;
        };
        check_field(name, value, spec, schema.patterns.get(name))?;
    }

    if let Some(extra) = obj.keys().find(|k| !schema.properties.contains_key(*k)) {
        return Err(SchemaViolation::new(extra, Violation::Unexpected));
    }
    Ok(())
}

fn check_field(
    name: &str,
    value: &Value,
    spec: &FieldSpec,
    pattern: Option<&Regex>,
) -> Result<(), SchemaViolation> {
    let fail = |kind| Err(SchemaViolation::new(name, kind));

    if let Some(expected) = spec.kind {
        if !expected.matches(value) {
            return fail(Violation::WrongType { expected });
        }
    }

    if let Some(s) = value.as_str() {
        let len = s.chars().count();
        if let Some(min) = spec.min_length {
            if len < min {
                return fail(Violation::MinLength { min, actual: len });
            }
        }
        if let Some(max) = spec.max_length {
            if len > max {
                return fail(Violation::MaxLength { max, actual: len });
            }
        }
        if let Some(re) = pattern {
            if !re.is_match(s) {
                return fail(Violation::Pattern {
                    pattern: spec.pattern.clone().unwrap_or_default(),
                });
            }
        }
        if spec.min_words.is_some() || spec.max_words.is_some() {
            let words = s.split_whitespace().count();
            if let Some(min) = spec.min_words {
                if words < min {
                    return fail(Violation::MinWords {
                        min,
                        actual: words,
                    });
                }
            }
            if let Some(max) = spec.max_words {
                if words > max {
                    return fail(Violation::MaxWords {
                        max,
                        actual: words,
                    });
                }
            }
        }
    }

    if let Some(allowed) = &spec.allowed {
        if !allowed.contains(value) {
            return fail(Violation::NotInEnum {
                allowed: Value::Array(allowed.clone()).to_string(),
            });
        }
    }
    Ok(())
}
