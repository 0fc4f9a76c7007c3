//! Request / response bodies of the `/api/*-agent` endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::message::ChatMessage;

/// Body of `POST /api/react-agent` and `POST /api/sql-agent`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentRequest {
    /// The user's message for this turn.
    pub message: String,
    /// Thread id returned by a previous response; omitted on the first turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    /// Client-side transcript. Sent by the chat client, ignored by the
    /// server, which keeps its own memory per thread.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<ChatMessage>>,
}

impl AgentRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// The supplied thread id, treating an empty string as absent.
    pub fn existing_thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Successful agent reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentResponse {
    pub content: String,
    pub thread_id: String,
}

/// Error body returned with every non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}
