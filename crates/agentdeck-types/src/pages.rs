//! Per-agent chat page configuration.

use serde::Serialize;

use crate::agent::AgentKind;

/// Input placeholder used when a page does not set its own.
pub const DEFAULT_PLACEHOLDER: &str = "Type your message here...";

/// What a chat page shows before the first turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChatPagePreset {
    pub agent: AgentKind,
    pub title: &'static str,
    pub initial_message: &'static str,
    pub placeholder: &'static str,
}

impl ChatPagePreset {
    pub fn for_agent(agent: AgentKind) -> Self {
        match agent {
            AgentKind::React => Self {
                agent,
                title: "ReAct Agent with Web Search",
                initial_message: "Hello! I'm a ReAct Agent that can search the web using the Tavily API. \
                    You can ask me questions, and I'll think step-by-step, search for information, \
                    and provide you with answers based on the latest information from the web.",
                placeholder: "Ask me anything that requires web search...",
            },
            AgentKind::Rag => Self {
                agent,
                title: "Conversational RAG",
                initial_message: "Hi there! I'm a Conversational RAG (Retrieval-Augmented Generation) agent. \
                    I can have contextual conversations by remembering our previous exchanges and \
                    retrieving relevant information from documents. Let's have a chat, and I'll \
                    maintain context throughout our conversation.",
                placeholder: "Ask me a question about a topic...",
            },
            AgentKind::Sql => Self {
                agent,
                title: "SQL Database Agent",
                initial_message: "Welcome! I'm an SQL Agent that can help you query databases. \
                    You can ask me questions about your data in natural language, and I'll translate \
                    them into SQL queries, execute them against your database, and provide you with \
                    the answers. Try asking something about your data!",
                placeholder: "Ask a question about your database...",
            },
        }
    }
}
