//! Command-line arguments.

use agentdeck_types::AgentKind;
use clap::Parser;

/// Chat with an agentdeck agent from the terminal
#[derive(Parser, Debug)]
#[command(name = "agentdeck-chat", version)]
pub struct Cli {
    /// Base URL of the agentdeck server
    #[arg(short, long, env = "AGENTDECK_SERVER_URL", default_value = "http://127.0.0.1:3000")]
    pub server: String,

    /// Agent to talk to (react, rag, sql)
    #[arg(short, long, default_value = "react")]
    pub agent: AgentKind,

    /// Log filter for diagnostics written to stderr
    #[arg(long, env = "AGENTDECK_CHAT_LOG", default_value = "warn")]
    pub log: String,
}
