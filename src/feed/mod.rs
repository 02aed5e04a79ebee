// src/feed/mod.rs
//! Feed merging: load (or start) the RSS document, refresh channel metadata,
//! prepend the new item, cap the item list, write once.

pub mod model;
mod codec;

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::config::FeedConfig;
use crate::content::Article;
use crate::error::{FeedError, Result};
use crate::storage::write_atomic;

pub use model::{Channel, FeedDocument, FeedItem, Guid, RawElement};

const XML_DECLARATION: &str = "<?xml version='1.0' encoding='utf-8'?>\n";

/// Parse a persisted feed. `origin` is only used in error messages.
///
/// A root other than `<rss>`, content after the root, or more than one
/// `<channel>` is rejected; an `<rss>` without a channel gets an empty one.
/// Elements outside the modelled subset are kept and written back on render.
pub fn parse_feed(xml: &str, origin: &Path) -> Result<FeedDocument> {
    codec::parse_document(xml).map_err(|e| FeedError::malformed(origin, e))
}

/// `None` when the file does not exist yet.
pub fn load_feed(path: &Path) -> Result<Option<FeedDocument>> {
    if !path.exists() {
        return Ok(None);
    }
    let xml = fs::read_to_string(path).map_err(|e| FeedError::io(path, e))?;
    parse_feed(&xml, path).map(Some)
}

/// First 12 hex chars of SHA-256(title).
fn title_digest(title: &str) -> String {
    let digest = Sha256::digest(title.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{b:02x}");
    }
    out
}

/// Feed entry for `article`, stamped with `now`.
pub fn build_item(article: &Article, now: DateTime<Utc>) -> FeedItem {
    FeedItem {
        title: Some(article.title.clone()),
        description: Some(article.body.clone()),
        link: Some(article.url.clone()),
        categories: vec![article.category.clone()],
        guid: Some(Guid {
            is_perma_link: Some("false".to_string()),
            value: format!("{}-{}", now.timestamp(), title_digest(&article.title)),
        }),
        pub_date: Some(now.to_rfc2822()),
        extra: Vec::new(),
    }
}

/// Overwrite channel metadata from config and stamp `lastBuildDate`.
fn refresh_channel(channel: &mut Channel, cfg: &FeedConfig, now: DateTime<Utc>) {
    channel.title = Some(cfg.title.clone());
    channel.link = Some(cfg.link.clone());
    channel.description = Some(cfg.description.clone());
    channel.language = Some(cfg.language.clone());
    channel.last_build_date = Some(now.to_rfc2822());
}

/// A zero item cap is a configuration error. Checked by [`merge`] and, before any
/// file is read, by the update stage.
pub fn ensure_capacity(cfg: &FeedConfig) -> Result<()> {
    if cfg.max_items == 0 {
        return Err(FeedError::config("MAX_ITEMS must be greater than 0"));
    }
    Ok(())
}

/// Merge `article` into `document` (or a fresh one) and cap at `cfg.max_items`.
pub fn merge(
    document: Option<FeedDocument>,
    article: &Article,
    cfg: &FeedConfig,
    now: DateTime<Utc>,
) -> Result<FeedDocument> {
    ensure_capacity(cfg)?;
    let mut doc = document.unwrap_or_default();
    refresh_channel(&mut doc.channel, cfg, now);

    let items = &mut doc.channel.items;
    items.insert(0, build_item(article, now));
    if items.len() > cfg.max_items {
        debug!(dropped = items.len() - cfg.max_items, "truncating feed items");
        items.truncate(cfg.max_items);
    }
    Ok(doc)
}

fn render_error(e: impl std::fmt::Display) -> FeedError {
    FeedError::Render {
        what: "feed",
        message: e.to_string(),
    }
}

/// XML declaration + two-space indented document + trailing newline.
pub fn render(doc: &FeedDocument) -> Result<String> {
    let body = codec::write_document(doc).map_err(render_error)?;
    let body = body.trim_start();

    let mut out = String::with_capacity(XML_DECLARATION.len() + body.len() + 1);
    out.push_str(XML_DECLARATION);
    out.push_str(body);
    out.push('\n');
    Ok(out)
}

/// Read-modify-write of the feed file. Returns the number of items kept.
pub fn update_feed_file(cfg: &FeedConfig, article: &Article, now: DateTime<Utc>) -> Result<usize> {
    let existing = load_feed(&cfg.feed_path)?;
    let created = existing.is_none();
    let doc = merge(existing, article, cfg, now)?;
    let xml = render(&doc)?;
    write_atomic(&cfg.feed_path, &xml)?;

    let count = doc.channel.items.len();
    info!(
        path = %cfg.feed_path.display(),
        items = count,
        max_items = cfg.max_items,
        created,
        "feed written"
    );
    Ok(count)
}
