//! Headless chat widget.
//!
//! Holds the transcript, the input line and the loading flag of one chat
//! page. Front ends render it and forward user actions; the widget decides
//! what each action does.

use agentdeck_types::{AgentKind, ChatMessage, ChatPagePreset, DEFAULT_PLACEHOLDER};
use tracing::{debug, error};

use crate::client::{AgentBackend, ClientError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub title: String,
    pub agent: AgentKind,
    pub initial_message: Option<String>,
    pub placeholder: String,
}

impl ChatConfig {
    pub fn new(title: impl Into<String>, agent: AgentKind) -> Self {
        Self {
            title: title.into(),
            agent,
            initial_message: None,
            placeholder: DEFAULT_PLACEHOLDER.to_owned(),
        }
    }
}

impl From<ChatPagePreset> for ChatConfig {
    fn from(preset: ChatPagePreset) -> Self {
        Self {
            title: preset.title.to_owned(),
            agent: preset.agent,
            initial_message: Some(preset.initial_message.to_owned()),
            placeholder: preset.placeholder.to_owned(),
        }
    }
}

/// A submitted message waiting for the agent's reply.
#[derive(Debug)]
#[must_use = "a pending turn keeps the widget loading until completed"]
pub struct PendingTurn {
    message: String,
}

impl PendingTurn {
    pub fn message(&self) -> &str {
        &self.message
    }
}

pub struct ChatWidget<B> {
    config: ChatConfig,
    backend: B,
    messages: Vec<ChatMessage>,
    input: String,
    is_loading: bool,
    scroll_requested: bool,
}

impl<B: AgentBackend> ChatWidget<B> {
    pub fn new(config: ChatConfig, backend: B) -> Self {
        let messages: Vec<ChatMessage> =
            config.initial_message.iter().map(ChatMessage::assistant).collect();
        let scroll_requested = !messages.is_empty();
        Self {
            config,
            backend,
            messages,
            input: String::new(),
            is_loading: false,
            scroll_requested,
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// No transcript yet: front ends show "No messages yet. Start the conversation!".
    pub fn is_empty_state(&self) -> bool {
        self.messages.is_empty()
    }

    /// Replace the input line. Ignored while a reply is pending.
    pub fn set_input(&mut self, text: impl Into<String>) {
        if !self.is_loading {
            self.input = text.into();
        }
    }

    /// Returns `true` once after each change to the transcript.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    /// Move the input into the transcript as a user message.
    ///
    /// Returns `None` and changes nothing when the input is blank or a reply
    /// is already pending.
    pub fn begin_submit(&mut self) -> Option<PendingTurn> {
        if self.is_loading || self.input.trim().is_empty() {
            return None;
        }
        let message = std::mem::take(&mut self.input);
        self.push(ChatMessage::user(message.clone()));
        self.is_loading = true;
        Some(PendingTurn { message })
    }

    /// Finish a turn. Failures are logged and leave no trace in the transcript.
    pub fn complete(&mut self, turn: PendingTurn, result: Result<String, ClientError>) {
        match result {
            Ok(content) => self.push(ChatMessage::assistant(content)),
            Err(e) => {
                error!(agent = %self.config.agent, turn = %turn.message, error = %e, "error getting agent response");
            }
        }
        self.is_loading = false;
    }

    /// Submit the current input and wait for the reply.
    pub async fn submit(&mut self) {
        let Some(turn) = self.begin_submit() else {
            return;
        };
        // The history the agent sees excludes the message just added.
        let history_len = self.messages.len() - 1;
        debug!(agent = %self.config.agent, history_len, "submitting turn");
        let result = self
            .backend
            .get_response(&turn.message, &self.messages[..history_len])
            .await;
        self.complete(turn, result);
    }

    fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.scroll_requested = true;
    }
}
