// src/config/feed.rs
use std::path::PathBuf;

use super::{Lookup, ProcessEnv, DEFAULT_ITEM_PATH, ENV_ITEM_PATH};
use crate::error::{FeedError, Result};

pub const DEFAULT_FEED_PATH: &str = "feed.xml";
pub const DEFAULT_FEED_TITLE: &str = "Personal Development Feed (DE)";
pub const DEFAULT_FEED_DESC: &str = "Tägliche Nuggets mit Link zum Weiterlesen.";
pub const DEFAULT_FEED_LINK: &str = "https://example.com/feed.xml";
pub const DEFAULT_LANGUAGE: &str = "de-de";
pub const DEFAULT_MAX_ITEMS: usize = 60;

/// Settings for the update-feed stage: channel metadata + retention cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: String,
    pub max_items: usize,
    pub feed_path: PathBuf,
    pub item_path: PathBuf,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_FEED_TITLE.to_string(),
            link: DEFAULT_FEED_LINK.to_string(),
            description: DEFAULT_FEED_DESC.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            max_items: DEFAULT_MAX_ITEMS,
            feed_path: PathBuf::from(DEFAULT_FEED_PATH),
            item_path: PathBuf::from(DEFAULT_ITEM_PATH),
        }
    }
}

impl FeedConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&ProcessEnv)
    }

    pub fn from_lookup(env: &impl Lookup) -> Result<Self> {
        let link = env
            .non_empty("FEED_LINK")
            .unwrap_or_else(|| repository_feed_link(env.get("GITHUB_REPOSITORY").as_deref()));

        Ok(Self {
            title: env
                .non_empty("FEED_TITLE")
                .unwrap_or_else(|| DEFAULT_FEED_TITLE.to_string()),
            link,
            description: env
                .non_empty("FEED_DESC")
                .unwrap_or_else(|| DEFAULT_FEED_DESC.to_string()),
            language: env
                .non_empty("FEED_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            max_items: parse_max_items(env.get("MAX_ITEMS"))?,
            feed_path: env.path_or("FEED_PATH", DEFAULT_FEED_PATH),
            item_path: env.path_or(ENV_ITEM_PATH, DEFAULT_ITEM_PATH),
        })
    }
}

/// `owner/repo` → GitHub Pages URL of the feed; anything else → example.com.
pub fn repository_feed_link(repository: Option<&str>) -> String {
    let (owner, repo) = repository
        .and_then(|r| r.split_once('/'))
        .unwrap_or_default();
    if owner.is_empty() || repo.is_empty() {
        return DEFAULT_FEED_LINK.to_string();
    }
    format!("https://{owner}.github.io/{repo}/feed.xml")
}

fn parse_max_items(raw: Option<String>) -> Result<usize> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_MAX_ITEMS);
    };
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| FeedError::config(format!("MAX_ITEMS must be an integer, got '{raw}'")))?;
    if value <= 0 {
        return Err(FeedError::config("MAX_ITEMS must be greater than 0"));
    }
    usize::try_from(value).map_err(|_| FeedError::config("MAX_ITEMS is out of range"))
}
