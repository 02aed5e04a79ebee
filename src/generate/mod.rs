// src/generate/mod.rs
//! Content acquisition: ask the generator once, fall back to the offline pool
//! on any failure, and only ever hand back a schema-valid [`Article`].

pub mod openai;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::FallbackSalt;
use crate::content::{Article, CATEGORIES};
use crate::error::{FeedError, Result};
use crate::schema::{validate, Schema, SchemaViolation};

pub use openai::OpenAiSource;

/// What the generator is asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub topic: String,
    pub categories: Vec<String>,
    pub min_words: usize,
    pub max_words: usize,
}

impl GenerationRequest {
    /// Categories and body word range come from the schema when it declares them.
    pub fn for_topic(topic: &str, schema: &Schema) -> Self {
        let categories = schema
            .enum_strings("category")
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| CATEGORIES.iter().map(|c| c.to_string()).collect());
        let (min_words, max_words) = match schema.word_bounds("body") {
            Some((min, max)) => (min.unwrap_or(150), max.unwrap_or(200)),
            None => (150, 200),
        };
        Self {
            topic: topic.to_string(),
            categories,
            min_words,
            max_words,
        }
    }
}

/// Why the live attempt did not produce a usable record. Logged, never surfaced.
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionFailure {
    #[error("no API credential configured")]
    MissingCredential,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("generator answered with HTTP {0}")]
    Status(u16),
    #[error("response contained no choices")]
    EmptyResponse,
    #[error("response is not a JSON record: {0}")]
    MalformedJson(String),
    #[error("response violates schema: {0}")]
    Schema(#[from] SchemaViolation),
}

/// A generative backend: one request, one raw JSON record back.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn generate(&self, request: &GenerationRequest)
        -> std::result::Result<Value, AcquisitionFailure>;
    fn name(&self) -> &'static str;
}

/// Used when no credential is configured; fails without touching the network.
pub struct DisabledSource;

#[async_trait]
impl ContentSource for DisabledSource {
    async fn generate(
        &self,
        _request: &GenerationRequest,
    ) -> std::result::Result<Value, AcquisitionFailure> {
        Err(AcquisitionFailure::MissingCredential)
    }
    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Non-empty list of offline articles (raw records, validated on use).
#[derive(Debug, Clone)]
pub struct FallbackPool(Vec<Value>);

impl FallbackPool {
    pub fn new(records: Vec<Value>) -> Option<Self> {
        if records.is_empty() {
            None
        } else {
            Some(Self(records))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn records(&self) -> &[Value] {
        &self.0
    }
}

/// Where the returned article came from.
#[derive(Debug)]
pub enum Origin {
    Generated { source: &'static str },
    Fallback {
        index: usize,
        reason: AcquisitionFailure,
    },
}

#[derive(Debug)]
pub struct Acquired {
    pub article: Article,
    pub origin: Origin,
}

/// Pool index for `topic`: `(Σ char codes + salt) mod len`.
pub fn fallback_index(topic: &str, salt: u64, pool_len: usize) -> usize {
    let checksum: u64 = topic.chars().map(|c| u64::from(u32::from(c))).sum();
    (checksum.wrapping_add(salt) % pool_len as u64) as usize
}

/// One live attempt: generate, validate, convert. Every failure is a value.
pub async fn attempt_generation(
    source: &dyn ContentSource,
    topic: &str,
    schema: &Schema,
) -> std::result::Result<Article, AcquisitionFailure> {
    let request = GenerationRequest::for_topic(topic, schema);
    let record = source.generate(&request).await?;
    validate(&record, schema)?;
    Ok(Article::from_record(&record, topic)?)
}

/// Acquire today's article.
///
/// Returns `Err` only when the selected fallback article is itself invalid.
pub async fn acquire(
    source: &dyn ContentSource,
    topic: &str,
    schema: &Schema,
    pool: &FallbackPool,
    salt: FallbackSalt,
) -> Result<Acquired> {
    let reason = match attempt_generation(source, topic, schema).await {
        Ok(article) => {
            info!(provider = source.name(), %topic, "article generated");
            return Ok(Acquired {
                article,
                origin: Origin::Generated {
                    source: source.name(),
                },
            });
        }
        Err(reason) => reason,
    };

    warn!(provider = source.name(), error = %reason, "generation failed, using fallback article");

    let index = fallback_index(topic, salt.value(), pool.len());
    let record = &pool.records()[index];
    let article = validate(record, schema)
        .and_then(|()| Article::from_record(record, topic))
        .map_err(|violation| FeedError::InvalidFallback { index, violation })?;

    info!(index, %topic, "fallback article selected");
    Ok(Acquired {
        article,
        origin: Origin::Fallback { index, reason },
    })
}
