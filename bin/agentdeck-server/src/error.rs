//! Unified server error type.
//!
//! Handlers return `Result<T, ServerError>`. The response body is always
//! `{"error": "..."}`; agent failures are logged with full detail and the
//! caller only gets the fixed message of the endpoint.

use agentdeck_agent::AgentError;
use agentdeck_types::ErrorBody;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ServerError {
    /// No hosted-model credential is configured.
    #[error("OpenAI API key is missing")]
    MissingApiKey,

    /// The caller sent an invalid or malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The ReAct agent failed; memory was left untouched.
    #[error("failed to generate a response: {0}")]
    Generate(#[source] AgentError),

    /// The SQL agent failed at some stage. The message reaches the caller.
    #[error("failed to process query: {0}")]
    Query(#[source] AgentError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            ServerError::MissingApiKey => {
                warn!("agent request rejected: OPENAI_API_KEY is not set");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ServerError::Generate(e) => {
                error!(error = %e, "react agent failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate a response".to_owned(),
                )
            }
            ServerError::Query(e) => {
                error!(error = %e, stage = ?e.stage(), "sql agent failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to process query: {e}"),
                )
            }
            ServerError::Internal(m) => {
                error!(detail = %m, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        (status, Json(ErrorBody { error: client_message })).into_response()
    }
}
