//! Hosted chat-model access for agentdeck.
//!
//! [`ChatModel`] is the seam every agent talks through. The production
//! implementation is [`openai::OpenAiChatModel`], which speaks the OpenAI
//! Chat Completions protocol; tests substitute scripted models.

pub mod error;
pub mod message;
pub mod model;
pub mod openai;
pub mod structured;

pub use error::LlmError;
pub use message::{ModelMessage, Role};
pub use model::{ChatModel, ChatRequest, ResponseFormat};
pub use openai::{OpenAiChatModel, OpenAiConfig};
pub use structured::generate_object;
