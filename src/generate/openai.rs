// src/generate/openai.rs
//! OpenAI Chat Completions backend (JSON response format).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{AcquisitionFailure, ContentSource, GenerationRequest};
use crate::error::{FeedError, Result};

pub const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

const SYSTEM_PROMPT: &str = "Du schreibst inspirierende, deutschsprachige Kurzartikel. \
Halte dich an die geforderten Wortzahlen und bleibe seriös.";

pub struct OpenAiSource {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiSource {
    /// `timeout` bounds the whole exchange; there is no retry.
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("daily-nugget-feed/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::config(format!("building HTTP client: {e}")))?;
        Ok(Self {
            http,
            api_key,
            model,
            endpoint: CHAT_COMPLETIONS_URL.to_string(),
        })
    }

    /// Point at a different chat-completions compatible endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// German user prompt naming the topic, the category list and the word range.
pub fn user_prompt(request: &GenerationRequest) -> String {
    let categories = serde_json::to_string(&request.categories).unwrap_or_else(|_| "[]".into());
    format!(
        "Erzeuge EINEN Artikel als JSON mit Feldern:\n\
         {{ \"title\": string, \"body\": string, \"url\": string, \"category\": string }}.\n\
         Sprache: Deutsch. Länge body: {min}–{max} Wörter.\n\
         Thema: \"{topic}\".\n\
         Kategorie: eine aus {categories}.\n\
         Am Ende des Textes keinen weiteren Call-to-Action; Link in \"url\".\n\
         Liefere ausschließlich ein JSON-Objekt ohne Kommentartext.",
        min = request.min_words,
        max = request.max_words,
        topic = request.topic,
    )
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}
#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}
#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    response_format: ResponseFormat,
    messages: Vec<Msg<'a>>,
}
#[derive(Deserialize)]
struct Resp {
    #[serde(default)]
    choices: Vec<Choice>,
}
#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}
#[derive(Deserialize)]
struct ChoiceMsg {
    #[serde(default)]
    content: Option<String>,
}

/// Pull the record out of a chat-completions body: first choice's content, parsed as JSON.
pub fn parse_completion(body: &str) -> std::result::Result<Value, AcquisitionFailure> {
    let resp: Resp =
        serde_json::from_str(body).map_err(|e| AcquisitionFailure::MalformedJson(e.to_string()))?;
    let content = resp
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(AcquisitionFailure::EmptyResponse)?;
    serde_json::from_str(&content).map_err(|e| AcquisitionFailure::MalformedJson(e.to_string()))
}

#[async_trait]
impl ContentSource for OpenAiSource {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<Value, AcquisitionFailure> {
        if self.api_key.is_empty() {
            return Err(AcquisitionFailure::MissingCredential);
        }

        let prompt = user_prompt(request);
        let req = Req {
            model: &self.model,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages: vec![
                Msg {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Msg {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        debug!(model = %self.model, topic = %request.topic, "calling chat completions");
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| AcquisitionFailure::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AcquisitionFailure::Status(status.as_u16()));
        }
        let body = resp
            .text()
            .await
            .map_err(|e| AcquisitionFailure::Transport(e.to_string()))?;
        parse_completion(&body)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
