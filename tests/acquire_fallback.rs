// tests/acquire_fallback.rs
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use daily_nugget_feed::config::FallbackSalt;
use daily_nugget_feed::generate::{
    acquire, fallback_index, AcquisitionFailure, ContentSource, DisabledSource, FallbackPool,
    GenerationRequest, Origin,
};
use daily_nugget_feed::schema::{validate, Schema};
use daily_nugget_feed::FeedError;
use serde_json::{json, Value};

const SCHEMA: &str = include_str!("../data/schema.json");
const FALLBACK: &str = include_str!("../data/fallback.json");

fn schema() -> Schema {
    Schema::from_json_str(SCHEMA).unwrap()
}

fn pool() -> FallbackPool {
    let records: Vec<Value> = serde_json::from_str(FALLBACK).unwrap();
    FallbackPool::new(records).unwrap()
}

fn body(n: usize) -> String {
    vec!["Sparen"; n].join(" ")
}

/// Returns a fixed record and counts calls.
struct FixedSource {
    record: Value,
    calls: AtomicUsize,
}

impl FixedSource {
    fn new(record: Value) -> Self {
        Self {
            record,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ContentSource for FixedSource {
    async fn generate(&self, _req: &GenerationRequest) -> Result<Value, AcquisitionFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.record.clone())
    }
    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Always fails like a dropped connection.
struct BrokenSource;

#[async_trait]
impl ContentSource for BrokenSource {
    async fn generate(&self, _req: &GenerationRequest) -> Result<Value, AcquisitionFailure> {
        Err(AcquisitionFailure::Transport("connection reset".into()))
    }
    fn name(&self) -> &'static str {
        "broken"
    }
}

#[tokio::test]
async fn valid_generated_record_is_used_trimmed_with_topic() {
    let src = FixedSource::new(json!({
        "title": "  Der Wert des Wartens  ",
        "body": format!(" {} ", body(160)),
        "url": "https://example.com/warten\n",
        "category": "Frugalismus"
    }));
    let got = acquire(&src, "Frugalismus", &schema(), &pool(), FallbackSalt::Fixed(0))
        .await
        .unwrap();
    assert!(matches!(got.origin, Origin::Generated { source: "fixed" }));
    assert_eq!(src.calls.load(Ordering::SeqCst), 1);
    assert_eq!(got.article.title, "Der Wert des Wartens");
    assert_eq!(got.article.url, "https://example.com/warten");
    assert_eq!(got.article.topic, "Frugalismus");
    assert!(!got.article.body.starts_with(' '));
}

#[tokio::test]
async fn missing_credential_falls_back_to_valid_pool_record() {
    let pool = pool();
    let schema = schema();
    let got = acquire(&DisabledSource, "Minimalismus", &schema, &pool, FallbackSalt::Fixed(0))
        .await
        .unwrap();

    let expected_index = fallback_index("Minimalismus", 0, pool.len());
    match &got.origin {
        Origin::Fallback { index, reason } => {
            assert_eq!(*index, expected_index);
            assert!(matches!(reason, AcquisitionFailure::MissingCredential));
        }
        other => panic!("expected fallback, got {other:?}"),
    }
    let source = &pool.records()[expected_index];
    assert_eq!(got.article.title, source["title"].as_str().unwrap().trim());
    assert_eq!(got.article.topic, "Minimalismus");
    assert!(validate(source, &schema).is_ok());
}

#[tokio::test]
async fn schema_violation_from_generator_falls_back() {
    // 20 words: far below minWords
    let src = FixedSource::new(json!({
        "title": "Zu kurz geraten",
        "body": body(20),
        "url": "https://example.com/kurz",
        "category": "Investieren"
    }));
    let got = acquire(&src, "Investieren", &schema(), &pool(), FallbackSalt::Fixed(3))
        .await
        .unwrap();
    match got.origin {
        Origin::Fallback { reason, .. } => {
            assert!(matches!(reason, AcquisitionFailure::Schema(ref v) if v.field == "body"));
        }
        other => panic!("expected fallback, got {other:?}"),
    }
}

#[tokio::test]
async fn transport_error_falls_back() {
    let got = acquire(&BrokenSource, "Selbstentwicklung", &schema(), &pool(), FallbackSalt::Fixed(1))
        .await
        .unwrap();
    assert!(matches!(
        got.origin,
        Origin::Fallback {
            reason: AcquisitionFailure::Transport(_),
            ..
        }
    ));
}

#[tokio::test]
async fn fixed_salt_makes_selection_repeatable() {
    let mut titles = Vec::new();
    for _ in 0..3 {
        let got = acquire(&DisabledSource, "Frugalismus", &schema(), &pool(), FallbackSalt::Fixed(42))
            .await
            .unwrap();
        titles.push(got.article.title);
    }
    titles.dedup();
    assert_eq!(titles.len(), 1);
}

#[tokio::test]
async fn every_bundled_fallback_is_reachable_and_valid() {
    let pool = pool();
    let schema = schema();
    for salt in 0..pool.len() as u64 {
        let got = acquire(&DisabledSource, "X", &schema, &pool, FallbackSalt::Fixed(salt)).await;
        assert!(got.is_ok(), "salt {salt}: {:?}", got.err());
    }
}

#[tokio::test]
async fn invalid_fallback_is_fatal() {
    let bad = FallbackPool::new(vec![json!({
        "title": "Kaputter Artikel",
        "body": "zu kurz",
        "url": "https://example.com/kaputt",
        "category": "Minimalismus"
    })])
    .unwrap();
    let err = acquire(&DisabledSource, "Minimalismus", &schema(), &bad, FallbackSalt::ProcessId)
        .await
        .unwrap_err();
    match err {
        FeedError::InvalidFallback { index, violation } => {
            assert_eq!(index, 0);
            assert_eq!(violation.field, "body");
        }
        other => panic!("expected InvalidFallback, got {other:?}"),
    }
}
