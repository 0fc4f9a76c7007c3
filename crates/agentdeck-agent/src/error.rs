use agentdeck_llm::LlmError;
use thiserror::Error;

use crate::sql::guard::GuardError;
use crate::sql::SqlStage;

/// Errors raised while running an agent.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Model(#[from] LlmError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("generated query rejected: {0}")]
    QueryRejected(#[from] GuardError),

    #[error("prompt template error: {0}")]
    Template(#[from] minijinja::Error),

    /// A SQL pipeline stage failed; later stages did not run.
    #[error("{stage} failed: {source}")]
    Stage {
        stage: SqlStage,
        #[source]
        source: Box<AgentError>,
    },
}

impl AgentError {
    pub(crate) fn in_stage(self, stage: SqlStage) -> Self {
        AgentError::Stage { stage, source: Box::new(self) }
    }

    /// The pipeline stage that failed, if this came out of the SQL agent.
    pub fn stage(&self) -> Option<SqlStage> {
        match self {
            AgentError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
