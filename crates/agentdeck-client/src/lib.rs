//! Front-end side of agentdeck: a session that talks to the agent endpoints
//! and a headless chat widget that front ends render.

pub mod client;
pub mod widget;

pub use client::{AgentBackend, AgentClient, ClientError};
pub use widget::{ChatConfig, ChatWidget, PendingTurn};
