//! Agent endpoints under `/api`.
//!
//! Both endpoints take [`AgentRequest`] and answer [`AgentResponse`]. The
//! credential check comes before anything else, body validation included.

mod react;
mod sql;

use std::sync::Arc;

use agentdeck_types::{AgentRequest, AgentResponse, ChatMessage, ChatRole, ErrorBody};
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::state::AppState;

/// Maximum accepted message length in bytes.
pub const MAX_MESSAGE_BYTES: usize = 128 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(react::react_agent, sql::sql_agent),
    components(schemas(AgentRequest, AgentResponse, ErrorBody, ChatMessage, ChatRole))
)]
pub struct AgentApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/react-agent", post(react::react_agent))
        .route("/sql-agent", post(sql::sql_agent))
}

pub fn api_docs() -> utoipa::openapi::OpenApi {
    AgentApi::openapi()
}

/// Unwrap and validate the request body.
fn read_request(payload: Result<Json<AgentRequest>, JsonRejection>) -> Result<AgentRequest, ServerError> {
    let Json(req) = payload.map_err(|rejection| ServerError::BadRequest(rejection.body_text()))?;

    if req.message.trim().is_empty() {
        return Err(ServerError::BadRequest("message must not be empty".into()));
    }
    if req.message.len() > MAX_MESSAGE_BYTES {
        return Err(ServerError::BadRequest(format!(
            "message too large ({} bytes); maximum is {} bytes",
            req.message.len(),
            MAX_MESSAGE_BYTES,
        )));
    }
    Ok(req)
}

/// The caller's thread id, or a new one.
fn resolve_thread_id(req: &AgentRequest) -> (String, bool) {
    match req.existing_thread_id() {
        Some(id) => (id.to_owned(), false),
        None => (agentdeck_agent::new_thread_id(), true),
    }
}
