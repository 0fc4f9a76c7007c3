//! Types shared between the agentdeck server and its clients.
//!
//! Everything that crosses the HTTP boundary lives here so the server
//! handlers and the chat client agree on field names (`threadId`, not
//! `thread_id`) without duplicating structs.

pub mod agent;
pub mod api;
pub mod message;
pub mod pages;

pub use agent::AgentKind;
pub use api::{AgentRequest, AgentResponse, ErrorBody};
pub use message::{ChatMessage, ChatRole};
pub use pages::{ChatPagePreset, DEFAULT_PLACEHOLDER};
