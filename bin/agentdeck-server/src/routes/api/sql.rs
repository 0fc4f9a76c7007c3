use std::sync::Arc;

use agentdeck_agent::SqlAgent;
use agentdeck_types::{AgentRequest, AgentResponse, ErrorBody};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::info;

use super::{read_request, resolve_thread_id};
use crate::error::ServerError;
use crate::state::AppState;

/// SQL question answering (`POST /api/sql-agent`).
///
/// Writes a read-only query for `message`, runs it against the configured
/// SQLite file and phrases the answer. `threadId` is echoed back but carries
/// no memory.
#[utoipa::path(
    post,
    path = "/api/sql-agent",
    tag = "agents",
    request_body = AgentRequest,
    responses(
        (status = 200, description = "Answer to the question", body = AgentResponse),
        (status = 400, description = "Malformed or empty message", body = ErrorBody),
        (status = 500, description = "Missing API key or a failed pipeline stage", body = ErrorBody),
    )
)]
pub async fn sql_agent(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AgentRequest>, JsonRejection>,
) -> Result<Json<AgentResponse>, ServerError> {
    let model = state.model()?;
    let req = read_request(payload)?;
    let (thread_id, _) = resolve_thread_id(&req);
    info!(%thread_id, question = %req.message, "sql agent question");

    let db = state.database().await.map_err(ServerError::Query)?;
    let agent = SqlAgent::new(model, db).with_top_k(state.config.sql_top_k);
    let outcome = agent.invoke(&req.message).await.map_err(ServerError::Query)?;

    Ok(Json(AgentResponse { content: outcome.answer, thread_id }))
}
