//! OpenAI Chat Completions client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::LlmError;
use crate::model::{ChatModel, ChatRequest, ResponseFormat};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Connection and sampling settings for [`OpenAiChatModel`].
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            temperature: 0.0,
            timeout: Duration::from_secs(120),
        }
    }
}

/// [`ChatModel`] backed by an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiChatModel {
    http: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiChatModel {
    /// Build a client. Fails with [`LlmError::MissingApiKey`] on an empty key.
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(bearer_headers(&config.api_key))
            .build()?;
        Ok(Self { http, config })
    }

    fn request_body(&self, request: &ChatRequest) -> Value {
        let mut body = json!({
            "model": self.config.model,
            "messages": request.messages,
            "temperature": self.config.temperature,
        });
        if let (ResponseFormat::JsonSchema { name, schema }, Some(obj)) =
            (&request.response_format, body.as_object_mut())
        {
            obj.insert(
                "response_format".into(),
                json!({
                    "type": "json_schema",
                    "json_schema": {
                        "name": name,
                        "schema": schema,
                        "strict": true,
                    }
                }),
            );
        }
        body
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    fn model_id(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        debug!(model = %self.config.model, messages = request.messages.len(), "chat completion");

        let resp = self.http.post(&url).json(&self.request_body(request)).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::api(status.as_u16(), &body));
        }

        let data: CompletionResponse = resp.json().await?;
        let choice = data.choices.into_iter().next().ok_or(LlmError::EmptyResponse)?;
        if let Some(refusal) = choice.message.refusal {
            return Err(LlmError::Refusal(refusal));
        }
        Ok(choice.message.content.unwrap_or_default())
    }
}

fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}
