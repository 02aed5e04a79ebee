// src/data.rs
//! Loading of the schema document and the offline fallback pool.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde_json::Value;

use crate::generate::FallbackPool;
use crate::schema::Schema;

pub fn load_schema(path: &Path) -> Result<Schema> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading schema from {}", path.display()))?;
    Schema::from_json_str(&content).with_context(|| format!("parsing schema {}", path.display()))
}

/// Fallback file must be a non-empty JSON array of article records.
pub fn load_fallback_pool(path: &Path) -> Result<FallbackPool> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading fallback articles from {}", path.display()))?;
    let records: Vec<Value> = serde_json::from_str(&content)
        .with_context(|| format!("parsing fallback articles {}", path.display()))?;
    FallbackPool::new(records)
        .ok_or_else(|| anyhow!("fallback file {} contains no articles", path.display()))
}
