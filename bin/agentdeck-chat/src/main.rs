//! agentdeck-chat – terminal front end for the chat widget.
//!
//! Lines typed on stdin are submitted as turns. `/reset` starts a new thread
//! and `/quit` (or end of input) exits.

mod cli;

use agentdeck_client::{AgentBackend, AgentClient, ChatConfig, ChatWidget};
use agentdeck_types::{ChatPagePreset, ChatRole};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_new(&cli.log)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ChatConfig::from(ChatPagePreset::for_agent(cli.agent));
    let client = AgentClient::new(&cli.server, cli.agent);
    let mut widget = ChatWidget::new(config, client);
    info!(server = %cli.server, agent = %cli.agent, "chat session started");

    let mut out = tokio::io::stdout();
    out.write_all(format!("== {} ==\n", widget.config().title).as_bytes()).await?;
    print_new(&mut widget, 0, &mut out).await?;
    if widget.is_empty_state() {
        out.write_all(b"No messages yet. Start the conversation!\n").await?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        out.write_all(format!("{} > ", widget.config().placeholder).as_bytes()).await?;
        out.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "/quit" => break,
            "/reset" => {
                widget.backend_mut().reset();
                out.write_all(b"(new thread)\n").await?;
                continue;
            }
            _ => {}
        }

        widget.set_input(line);
        let before = widget.messages().len();
        widget.submit().await;
        let after = widget.messages().len();
        if after == before {
            continue;
        }
        // The user's own line is already on screen.
        print_new(&mut widget, before + 1, &mut out).await?;
        if after == before + 1 {
            out.write_all(b"(no reply, see log)\n").await?;
        }
    }

    Ok(())
}

/// Print transcript entries from `from` on when the widget asks to scroll.
async fn print_new<B: AgentBackend>(
    widget: &mut ChatWidget<B>,
    from: usize,
    out: &mut tokio::io::Stdout,
) -> std::io::Result<()> {
    if !widget.take_scroll_request() {
        return Ok(());
    }
    for message in widget.messages().iter().skip(from) {
        let who = match message.role {
            ChatRole::User => "you",
            ChatRole::Assistant => "agent",
        };
        let time = message.timestamp.with_timezone(&chrono::Local).format("%H:%M:%S");
        out.write_all(format!("[{time}] {who}: {}\n", message.content).as_bytes()).await?;
    }
    Ok(())
}
