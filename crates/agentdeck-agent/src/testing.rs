//! Scripted models shared by the agent tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use agentdeck_llm::{ChatModel, ChatRequest, LlmError};
use async_trait::async_trait;

/// Returns queued replies in order and records every request it sees.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, String>>>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedModel {
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a failure with the given API error message.
    pub fn then_fail(self, message: &str) -> Self {
        self.replies.lock().unwrap().push_back(Err(message.to_owned()));
        self
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn model_id(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &ChatRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(LlmError::Api { status: 500, message }),
            None => Err(LlmError::EmptyResponse),
        }
    }
}
