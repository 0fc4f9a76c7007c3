use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// The agents a chat page can talk to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AgentKind {
    /// Conversational agent with per-thread memory.
    React,
    /// Conversational RAG. Listed in the UI, no endpoint behind it.
    Rag,
    /// Natural-language to SQL over the local database.
    Sql,
}

impl AgentKind {
    /// API endpoint serving this agent, if any.
    pub fn endpoint(self) -> Option<&'static str> {
        match self {
            AgentKind::React => Some("/api/react-agent"),
            AgentKind::Rag => None,
            AgentKind::Sql => Some("/api/sql-agent"),
        }
    }

    /// Browser route rendering the chat page for this agent.
    pub fn page_path(self) -> &'static str {
        match self {
            AgentKind::React => "/react-agent",
            AgentKind::Rag => "/conversational-rag",
            AgentKind::Sql => "/sql-agent",
        }
    }

    /// Sidebar label.
    pub fn label(self) -> &'static str {
        match self {
            AgentKind::React => "ReAct Agent",
            AgentKind::Rag => "Conversational RAG",
            AgentKind::Sql => "SQL Agent",
        }
    }

    /// Sidebar tooltip.
    pub fn description(self) -> &'static str {
        match self {
            AgentKind::React => "Web search with Tavily API",
            AgentKind::Rag => "Conversation memory with RAG",
            AgentKind::Sql => "Query SQL databases",
        }
    }
}
