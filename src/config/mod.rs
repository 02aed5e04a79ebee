// src/config/mod.rs
//! Run configuration, built once per process from the environment and passed
//! down explicitly. Nothing below `config` reads env vars.

pub mod ai;
pub mod feed;

pub use ai::{FallbackSalt, GenerateConfig};
pub use feed::FeedConfig;

use std::path::PathBuf;

pub const ENV_ITEM_PATH: &str = "ITEM_PATH";
pub const DEFAULT_ITEM_PATH: &str = "item.json";

/// Key lookup used by the `from_lookup` constructors; `std::env::var` in production,
/// a map in tests.
pub trait Lookup {
    fn get(&self, key: &str) -> Option<String>;

    /// Trimmed, non-empty value.
    fn non_empty(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn path_or(&self, key: &str, default: &str) -> PathBuf {
        PathBuf::from(self.non_empty(key).unwrap_or_else(|| default.to_string()))
    }
}

/// Reads the real process environment.
pub struct ProcessEnv;

impl Lookup for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<F> Lookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        self(key)
    }
}
