//! Helpers for the route tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use agentdeck_agent::{AgentError, QueryRunner};
use agentdeck_llm::{ChatModel, ChatRequest, LlmError};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::config::Config;
use crate::routes;
use crate::state::AppState;

/// Answers from a fixed script; `Err` entries fail with that API message.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedModel {
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn model_id(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &ChatRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(LlmError::Api { status: 502, message }),
            None => Err(LlmError::EmptyResponse),
        }
    }
}

/// Fixed schema and query result; records the SQL it receives.
pub struct FixedRunner {
    pub result: String,
    pub ran: Mutex<Vec<String>>,
}

impl FixedRunner {
    pub fn new(result: &str) -> Arc<Self> {
        Arc::new(Self { result: result.into(), ran: Mutex::new(Vec::new()) })
    }
}

#[async_trait]
impl QueryRunner for FixedRunner {
    fn dialect(&self) -> &str {
        "sqlite"
    }

    async fn table_info(&self) -> Result<String, AgentError> {
        Ok("CREATE TABLE Artist (ArtistId INTEGER, Name TEXT)".into())
    }

    async fn run(&self, sql: &str) -> String {
        self.ran.lock().unwrap().push(sql.to_owned());
        self.result.clone()
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|_| None)
}

/// State without an API key.
pub fn no_key_state() -> Arc<AppState> {
    Arc::new(AppState::new(test_config(), None))
}

pub fn scripted(replies: Vec<Result<&str, &str>>) -> (AppState, Arc<ScriptedModel>) {
    let model = Arc::new(ScriptedModel {
        replies: Mutex::new(
            replies
                .into_iter()
                .map(|r| r.map(str::to_owned).map_err(str::to_owned))
                .collect(),
        ),
        requests: Mutex::new(Vec::new()),
    });
    let state = AppState::new(test_config(), Some(model.clone()));
    (state, model)
}

/// Run one request through the full router.
pub async fn send(state: &Arc<AppState>, req: Request<Body>) -> (StatusCode, String) {
    let resp = routes::build(Arc::clone(state)).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// POST a raw JSON body and decode the JSON reply.
pub async fn call(state: &Arc<AppState>, path: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::post(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();
    let (status, text) = send(state, req).await;
    (status, serde_json::from_str(&text).unwrap())
}
