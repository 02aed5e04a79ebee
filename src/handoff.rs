// src/handoff.rs
//! `item.json`: the single record passed from the generate stage to the feed stage.

use std::fs;
use std::path::Path;

use crate::content::{is_known_category, Article};
use crate::error::{FeedError, Result};
use crate::storage::write_atomic;

pub fn write_item(path: &Path, article: &Article) -> Result<()> {
    let json = serde_json::to_string_pretty(article).map_err(|e| FeedError::Render {
        what: "item record",
        message: e.to_string(),
    })?;
    write_atomic(path, &(json + "\n"))
}

/// Read the record written by the generate stage; the category must be a known one.
pub fn read_item(path: &Path) -> Result<Article> {
    let invalid = |message: String| FeedError::InvalidItem {
        path: path.to_path_buf(),
        message,
    };
    if !path.exists() {
        return Err(invalid(
            "not found, run the generate stage first".to_string(),
        ));
    }
    let data = fs::read_to_string(path).map_err(|e| FeedError::io(path, e))?;
    let article: Article = serde_json::from_str(&data).map_err(|e| invalid(e.to_string()))?;
    if !is_known_category(&article.category) {
        return Err(invalid(format!("unknown category '{}'", article.category)));
    }
    Ok(article)
}
