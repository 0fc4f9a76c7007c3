use async_trait::async_trait;
use serde_json::Value;

use crate::error::LlmError;
use crate::message::ModelMessage;

/// Output constraint requested from the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// Free-form text.
    Text,
    /// JSON conforming to `schema`, enforced by the provider.
    JsonSchema { name: String, schema: Value },
}

/// One model invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ModelMessage>,
    pub response_format: ResponseFormat,
}

impl ChatRequest {
    pub fn text(messages: Vec<ModelMessage>) -> Self {
        Self { messages, response_format: ResponseFormat::Text }
    }

    /// A request carrying a single user message.
    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self::text(vec![ModelMessage::user(prompt)])
    }
}

/// A hosted chat model.
///
/// Implementations return the text of the first choice. Retries, streaming
/// and tool calls are not part of this interface.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Identifier of the underlying model, for logging.
    fn model_id(&self) -> &str;

    async fn generate(&self, request: &ChatRequest) -> Result<String, LlmError>;
}
