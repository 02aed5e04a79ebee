// src/config/ai.rs
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;

use super::{Lookup, ProcessEnv, DEFAULT_ITEM_PATH, ENV_ITEM_PATH};
use crate::error::{FeedError, Result};
use crate::topics::{default_epoch, DEFAULT_TOPICS};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_SCHEMA_PATH: &str = "data/schema.json";
pub const DEFAULT_FALLBACK_PATH: &str = "data/fallback.json";

/// Extra term added to the topic checksum when picking a fallback article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackSalt {
    /// Current process id: varies between runs on the same day.
    ProcessId,
    /// Fixed value: selection becomes a pure function of the topic.
    Fixed(u64),
}

impl FallbackSalt {
    pub fn value(self) -> u64 {
        match self {
            FallbackSalt::ProcessId => u64::from(std::process::id()),
            FallbackSalt::Fixed(v) => v,
        }
    }

    fn parse(raw: Option<String>) -> Result<Self> {
        match raw.as_deref() {
            None => Ok(FallbackSalt::ProcessId),
            Some(s) if s.eq_ignore_ascii_case("pid") => Ok(FallbackSalt::ProcessId),
            Some(s) => s.parse::<u64>().map(FallbackSalt::Fixed).map_err(|_| {
                FeedError::config(format!(
                    "FALLBACK_SALT must be 'pid' or an unsigned integer, got '{s}'"
                ))
            }),
        }
    }
}

/// Settings for the generate stage.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Raw `TOPICS` value (may be empty).
    pub topics: String,
    /// Raw `DEFAULT_TOPICS` value, used when `topics` is empty.
    pub default_topics: String,
    pub topic_epoch: NaiveDate,
    /// `None` means no credential: the generator is skipped entirely.
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
    pub salt: FallbackSalt,
    pub schema_path: PathBuf,
    pub fallback_path: PathBuf,
    pub item_path: PathBuf,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            topics: String::new(),
            default_topics: DEFAULT_TOPICS.to_string(),
            topic_epoch: default_epoch(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            salt: FallbackSalt::ProcessId,
            schema_path: PathBuf::from(DEFAULT_SCHEMA_PATH),
            fallback_path: PathBuf::from(DEFAULT_FALLBACK_PATH),
            item_path: PathBuf::from(DEFAULT_ITEM_PATH),
        }
    }
}

impl GenerateConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&ProcessEnv)
    }

    pub fn from_lookup(env: &impl Lookup) -> Result<Self> {
        let topic_epoch = match env.non_empty("TOPIC_EPOCH") {
            Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| {
                FeedError::config(format!("TOPIC_EPOCH must be YYYY-MM-DD, got '{raw}': {e}"))
            })?,
            None => default_epoch(),
        };

        let timeout = match env.non_empty("OPENAI_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(FeedError::config(format!(
                        "OPENAI_TIMEOUT_SECS must be a positive integer, got '{raw}'"
                    )))
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            topics: env.get("TOPICS").unwrap_or_default(),
            default_topics: env
                .get("DEFAULT_TOPICS")
                .unwrap_or_else(|| DEFAULT_TOPICS.to_string()),
            topic_epoch,
            api_key: env.non_empty("OPENAI_API_KEY"),
            model: env
                .non_empty("MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout,
            salt: FallbackSalt::parse(env.non_empty("FALLBACK_SALT"))?,
            schema_path: env.path_or("SCHEMA_PATH", DEFAULT_SCHEMA_PATH),
            fallback_path: env.path_or("FALLBACK_PATH", DEFAULT_FALLBACK_PATH),
            item_path: env.path_or(ENV_ITEM_PATH, DEFAULT_ITEM_PATH),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = GenerateConfig::from_lookup(&lookup(&[])).unwrap();
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.salt, FallbackSalt::ProcessId);
        assert_eq!(cfg.topic_epoch, default_epoch());
        assert_eq!(cfg.default_topics, DEFAULT_TOPICS);
        assert_eq!(cfg.item_path, PathBuf::from("item.json"));
    }

    #[test]
    fn blank_key_and_model_fall_back() {
        let cfg = GenerateConfig::from_lookup(&lookup(&[
            ("OPENAI_API_KEY", "   "),
            ("MODEL", ""),
            ("FALLBACK_SALT", "7"),
        ]))
        .unwrap();
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.salt, FallbackSalt::Fixed(7));
    }

    #[test]
    fn bad_values_are_configuration_errors() {
        for pairs in [
            [("TOPIC_EPOCH", "01.01.2025")],
            [("OPENAI_TIMEOUT_SECS", "0")],
            [("FALLBACK_SALT", "random")],
        ] {
            let err = GenerateConfig::from_lookup(&lookup(&pairs)).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{pairs:?}");
        }
    }
}
