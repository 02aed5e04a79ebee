// src/stages.rs
//! The two process entrypoints as library functions, so tests can drive them
//! against a temp directory.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::config::{FeedConfig, GenerateConfig};
use crate::data::{load_fallback_pool, load_schema};
use crate::error::{FeedError, Result};
use crate::feed::{ensure_capacity, update_feed_file};
use crate::generate::{acquire, Acquired, ContentSource, DisabledSource, OpenAiSource};
use crate::handoff::{read_item, write_item};
use crate::topics::{pick_for_today, resolve_topics};

/// Generator for this run: OpenAI when a key is configured, otherwise disabled.
pub fn build_source(cfg: &GenerateConfig) -> Result<Box<dyn ContentSource>> {
    match &cfg.api_key {
        Some(key) => Ok(Box::new(OpenAiSource::new(
            key.clone(),
            cfg.model.clone(),
            cfg.timeout,
        )?)),
        None => Ok(Box::new(DisabledSource)),
    }
}

/// Stage (a): pick the topic, acquire an article, write the handoff record.
pub async fn generate_item(
    cfg: &GenerateConfig,
    source: &dyn ContentSource,
    today: NaiveDate,
) -> Result<Acquired> {
    let schema = load_schema(&cfg.schema_path).map_err(FeedError::config)?;
    let pool = load_fallback_pool(&cfg.fallback_path).map_err(FeedError::config)?;
    let topics = resolve_topics(&cfg.topics, &cfg.default_topics)?;
    let topic = pick_for_today(&topics, today, cfg.topic_epoch);
    info!(%topic, %today, topics = topics.len(), "topic selected");

    let acquired = acquire(source, topic, &schema, &pool, cfg.salt).await?;
    write_item(&cfg.item_path, &acquired.article)?;
    Ok(acquired)
}

/// Stage (b): read the handoff record and merge it into the feed file.
pub fn update_feed(cfg: &FeedConfig, now: DateTime<Utc>) -> Result<usize> {
    ensure_capacity(cfg)?;
    let article = read_item(&cfg.item_path)?;
    update_feed_file(cfg, &article, now)
}
