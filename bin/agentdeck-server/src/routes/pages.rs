//! Browser chat pages.
//!
//! One page per [`AgentKind`], all rendered from `templates/chat.html`. The
//! page script follows the same rules as the headless chat widget and keeps
//! its thread id in `sessionStorage`, one key per agent.

use std::sync::Arc;

use agentdeck_types::{AgentKind, ChatPagePreset};
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::Router;
use minijinja::{context, Environment};
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::error::ServerError;
use crate::state::AppState;

const CHAT_TEMPLATE: &str = include_str!("../../templates/chat.html");

#[derive(Serialize)]
struct NavLink {
    href: &'static str,
    label: &'static str,
    description: &'static str,
    active: bool,
}

#[derive(Serialize)]
struct PageScript {
    agent: AgentKind,
    endpoint: Option<&'static str>,
}

pub fn router() -> Router<Arc<AppState>> {
    let mut router = Router::new().route("/", get(|| async { Redirect::temporary(AgentKind::React.page_path()) }));
    for kind in AgentKind::iter() {
        router = router.route(kind.page_path(), get(move || async move { chat_page(kind) }));
    }
    router
}

fn chat_page(kind: AgentKind) -> Result<Html<String>, ServerError> {
    render(ChatPagePreset::for_agent(kind))
        .map(Html)
        .map_err(|e| ServerError::Internal(format!("rendering {} page: {e}", kind)))
}

fn render(preset: ChatPagePreset) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("chat.html", CHAT_TEMPLATE)?;

    let nav: Vec<NavLink> = AgentKind::iter()
        .map(|kind| NavLink {
            href: kind.page_path(),
            label: kind.label(),
            description: kind.description(),
            active: kind == preset.agent,
        })
        .collect();
    let script = PageScript { agent: preset.agent, endpoint: preset.agent.endpoint() };

    env.get_template("chat.html")?.render(context! {
        title => preset.title,
        initial_message => preset.initial_message,
        placeholder => preset.placeholder,
        nav => nav,
        script => script,
    })
}
