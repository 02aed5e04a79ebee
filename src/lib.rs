// src/lib.rs
// Library surface shared by the two stage binaries and the integration tests.

pub mod config;
pub mod content;
pub mod data;
pub mod error;
pub mod feed;
pub mod generate;
pub mod handoff;
pub mod logging;
pub mod schema;
pub mod stages;
pub mod storage;
pub mod topics;

// ---- Re-exports for stable public API ----
pub use crate::content::Article;
pub use crate::error::{FeedError, Result};
pub use crate::schema::{validate, Schema, SchemaViolation};
