//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use agentdeck_agent::{AgentError, MemoryStore, QueryRunner, SqlDatabase};
use agentdeck_llm::{ChatModel, LlmError, OpenAiChatModel};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::ServerError;

pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// `None` when no API key is configured.
    pub model: Option<Arc<dyn ChatModel>>,
    /// Conversation memory of the ReAct agent, keyed by thread id.
    pub memory: Arc<MemoryStore>,
    /// Opened by the first SQL request.
    database: OnceCell<Arc<dyn QueryRunner>>,
}

impl AppState {
    pub fn new(config: Config, model: Option<Arc<dyn ChatModel>>) -> Self {
        Self {
            config: Arc::new(config),
            model,
            memory: Arc::new(MemoryStore::new()),
            database: OnceCell::new(),
        }
    }

    /// Build the state, connecting the hosted model when a key is configured.
    pub fn from_config(config: Config) -> Result<Self, LlmError> {
        let model: Option<Arc<dyn ChatModel>> = match config.openai() {
            Some(openai) => {
                let model = OpenAiChatModel::new(openai)?;
                info!(model = model.model_id(), "hosted model configured");
                Some(Arc::new(model))
            }
            None => {
                warn!("OPENAI_API_KEY is not set; agent endpoints will answer 500");
                None
            }
        };
        Ok(Self::new(config, model))
    }

    /// Use `db` instead of opening the configured file.
    #[cfg(test)]
    pub fn with_database(mut self, db: Arc<dyn QueryRunner>) -> Self {
        self.database = OnceCell::new_with(Some(db));
        self
    }

    pub fn model(&self) -> Result<Arc<dyn ChatModel>, ServerError> {
        self.model.clone().ok_or(ServerError::MissingApiKey)
    }

    /// The SQL agent's database, opened read-only on first use.
    ///
    /// A failed open is not cached; the next request tries again.
    pub async fn database(&self) -> Result<Arc<dyn QueryRunner>, AgentError> {
        let db = self
            .database
            .get_or_try_init(|| async {
                let path = &self.config.sql_database;
                let db = SqlDatabase::open(path, self.config.sql_max_rows).await?;
                info!(path = %path.display(), "sql database opened");
                Ok::<Arc<dyn QueryRunner>, AgentError>(Arc::new(db))
            })
            .await?;
        Ok(Arc::clone(db))
    }

    pub fn database_opened(&self) -> bool {
        self.database.initialized()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("model", &self.model.as_ref().map(|m| m.model_id()))
            .field("threads", &self.memory.thread_count())
            .field("database_opened", &self.database_opened())
            .finish()
    }
}
