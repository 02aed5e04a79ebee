// src/content.rs
//! The article record handed from the generate stage to the feed stage.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{SchemaViolation, Violation};

/// Categories the feed accepts; also the default enumeration sent to the generator.
pub const CATEGORIES: [&str; 4] = [
    "Minimalismus",
    "Selbstentwicklung",
    "Frugalismus",
    "Investieren",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub body: String,
    pub url: String,
    pub category: String,
    #[serde(default)]
    pub topic: String,
}

impl Article {
    /// Build from an already schema-validated record: trims the string fields
    /// and attaches the resolved topic.
    ///
    /// Fails when one of the four article fields is absent or not a string,
    /// which a schema that does not require them would let through.
    pub fn from_record(record: &Value, topic: &str) -> Result<Self, SchemaViolation> {
        let field = |name: &str| -> Result<String, SchemaViolation> {
            match record.get(name) {
                Some(Value::String(s)) => Ok(s.trim().to_string()),
                Some(_) => Err(SchemaViolation::new(
                    name,
                    Violation::WrongType {
                        expected: crate::schema::FieldType::String,
                    },
                )),
                None => Err(SchemaViolation::new(name, Violation::Missing)),
            }
        };
        Ok(Self {
            title: field("title")?,
            body: field("body")?,
            url: field("url")?,
            category: field("category")?,
            topic: topic.to_string(),
        })
    }
}

pub fn is_known_category(category: &str) -> bool {
    CATEGORIES.contains(&category)
}
