use std::sync::Arc;

use agentdeck_agent::ReactAgent;
use agentdeck_types::{AgentRequest, AgentResponse, ErrorBody};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::info;

use super::{read_request, resolve_thread_id};
use crate::error::ServerError;
use crate::state::AppState;

/// Conversational agent (`POST /api/react-agent`).
///
/// Replies to `message` with the thread's earlier turns as context. The turn
/// is added to the thread's memory only when the model call succeeds.
#[utoipa::path(
    post,
    path = "/api/react-agent",
    tag = "agents",
    request_body = AgentRequest,
    responses(
        (status = 200, description = "Assistant reply", body = AgentResponse),
        (status = 400, description = "Malformed or empty message", body = ErrorBody),
        (status = 500, description = "Missing API key or model failure", body = ErrorBody),
    )
)]
pub async fn react_agent(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AgentRequest>, JsonRejection>,
) -> Result<Json<AgentResponse>, ServerError> {
    let model = state.model()?;
    let req = read_request(payload)?;
    let (thread_id, new_thread) = resolve_thread_id(&req);
    info!(%thread_id, new_thread, message_len = req.message.len(), "react agent turn");

    let agent = ReactAgent::new(model, Arc::clone(&state.memory));
    let content = agent
        .invoke(&thread_id, &req.message)
        .await
        .map_err(ServerError::Generate)?;

    Ok(Json(AgentResponse { content, thread_id }))
}

#[cfg(test)]
mod test {
    use crate::testing::{call, no_key_state, scripted};
    use axum::http::StatusCode;
    use std::sync::Arc;
    use serde_json::json;

    #[tokio::test]
    async fn missing_key_is_500_without_touching_memory() {
        let state = no_key_state();
        let (status, body) =
            call(&state, "/api/react-agent", &json!({ "message": "hi" }).to_string()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "OpenAI API key is missing" }));
        assert_eq!(state.memory.thread_count(), 0);
    }

    #[tokio::test]
    async fn missing_key_wins_over_bad_body() {
        let state = no_key_state();
        let (status, body) = call(&state, "/api/react-agent", "{").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "OpenAI API key is missing");
    }

    #[tokio::test]
    async fn first_turn_gets_thread_id() {
        let (state, _model) = scripted(vec![Ok("Hello there")]);
        let state = Arc::new(state);
        let (status, body) =
            call(&state, "/api/react-agent", &json!({ "message": "hi" }).to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "Hello there");
        let thread_id = body["threadId"].as_str().unwrap();
        assert!(thread_id.parse::<i64>().unwrap() > 0);
        assert_eq!(state.memory.history(thread_id).await.len(), 2);
    }

    #[tokio::test]
    async fn thread_history_grows_by_two_per_turn() {
        let (state, model) = scripted(vec![Ok("Nice to meet you, Bob"), Ok("Your name is Bob")]);
        let state = Arc::new(state);

        let (_, first) = call(
            &state,
            "/api/react-agent",
            &json!({ "message": "I'm Bob", "threadId": "t-1" }).to_string(),
        )
        .await;
        assert_eq!(first["threadId"], "t-1");

        let (status, second) = call(
            &state,
            "/api/react-agent",
            &json!({ "message": "What's my name?", "threadId": "t-1" }).to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["content"], "Your name is Bob");
        assert_eq!(state.memory.history("t-1").await.len(), 4);

        let seen = model.requests();
        assert_eq!(seen[0].messages.len(), 1);
        assert_eq!(seen[1].messages.len(), 3);
        assert_eq!(seen[1].messages[0].content, "I'm Bob");
    }

    #[tokio::test]
    async fn model_failure_is_500_and_memory_unchanged() {
        let (state, _model) = scripted(vec![Err("upstream exploded")]);
        let state = Arc::new(state);
        let (status, body) = call(
            &state,
            "/api/react-agent",
            &json!({ "message": "hi", "threadId": "t-2" }).to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to generate a response" }));
        assert!(state.memory.history("t-2").await.is_empty());
    }
}
