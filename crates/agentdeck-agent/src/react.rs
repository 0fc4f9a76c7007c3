//! Conversational agent: one model call per turn over the thread's history.

use std::sync::Arc;

use agentdeck_llm::{ChatModel, ChatRequest, ModelMessage};
use tracing::debug;

use crate::error::AgentError;
use crate::memory::MemoryStore;

pub struct ReactAgent {
    model: Arc<dyn ChatModel>,
    memory: Arc<MemoryStore>,
}

impl ReactAgent {
    pub fn new(model: Arc<dyn ChatModel>, memory: Arc<MemoryStore>) -> Self {
        Self { model, memory }
    }

    /// Run one turn on `thread_id` and return the assistant's reply.
    ///
    /// The model sees the whole thread plus `message`. The thread grows by
    /// the user message and the reply only when the model call succeeds.
    pub async fn invoke(&self, thread_id: &str, message: &str) -> Result<String, AgentError> {
        let mut thread = self.memory.checkout(thread_id).await;

        let user = ModelMessage::user(message);
        let mut messages = thread.to_vec();
        messages.push(user.clone());
        debug!(thread_id, history = thread.len(), model = self.model.model_id(), "calling model");

        let reply = self.model.generate(&ChatRequest::text(messages)).await?;

        thread.push(user);
        thread.push(ModelMessage::assistant(reply.clone()));
        Ok(reply)
    }
}
