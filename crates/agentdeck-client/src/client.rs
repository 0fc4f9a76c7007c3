use agentdeck_types::{AgentKind, AgentRequest, AgentResponse, ChatMessage};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Shown to the user as-is; the cause is only logged.
    #[error("Failed to generate a response. Please try again.")]
    RequestFailed,
    #[error("the {0} agent is not available")]
    Unavailable(AgentKind),
}

/// Something that can answer a chat turn.
#[async_trait]
pub trait AgentBackend: Send {
    /// `history` is the transcript before `message` was added.
    async fn get_response(
        &mut self,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<String, ClientError>;
}

/// A conversation with one agent endpoint.
///
/// Remembers the thread id handed out by the server and replays it, so every
/// turn sent through the same session lands on the same server-side thread.
#[derive(Debug, Clone)]
pub struct AgentClient {
    http: reqwest::Client,
    base_url: String,
    kind: AgentKind,
    thread_id: Option<String>,
}

impl AgentClient {
    pub fn new(base_url: impl Into<String>, kind: AgentKind) -> Self {
        Self::with_http(reqwest::Client::new(), base_url, kind)
    }

    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>, kind: AgentKind) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            kind,
            thread_id: None,
        }
    }

    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    /// Forget the thread; the next turn starts a new conversation.
    pub fn reset(&mut self) {
        self.thread_id = None;
    }

    async fn post(&self, endpoint: &str, body: &AgentRequest) -> Result<AgentResponse, String> {
        let url = format!("{}{}", self.base_url, endpoint);
        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| format!("request to {url} failed: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(format!("{url} returned {status}: {text}"));
        }
        resp.json::<AgentResponse>()
            .await
            .map_err(|e| format!("invalid response from {url}: {e}"))
    }
}

#[async_trait]
impl AgentBackend for AgentClient {
    async fn get_response(
        &mut self,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<String, ClientError> {
        let Some(endpoint) = self.kind.endpoint() else {
            return Err(ClientError::Unavailable(self.kind));
        };

        let body = AgentRequest {
            message: message.to_owned(),
            thread_id: self.thread_id.clone(),
            history: (!history.is_empty()).then(|| history.to_vec()),
        };

        match self.post(endpoint, &body).await {
            Ok(reply) => {
                if !reply.thread_id.is_empty() {
                    debug!(agent = %self.kind, thread_id = %reply.thread_id, "thread id stored");
                    self.thread_id = Some(reply.thread_id);
                }
                Ok(reply.content)
            }
            Err(cause) => {
                error!(agent = %self.kind, %cause, "agent request failed");
                Err(ClientError::RequestFailed)
            }
        }
    }
}
