use std::sync::Arc;

use agentdeck_llm::{generate_object, ChatModel, ChatRequest, ModelMessage};
use schemars::JsonSchema;
use serde::Deserialize;
use strum::Display;
use tracing::{debug, info};

use super::database::QueryRunner;
use super::guard::ensure_read_only;
use super::prompt::{generate_answer_prompt, write_query_prompt, DEFAULT_TOP_K};
use crate::error::AgentError;

/// Steps of the SQL pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SqlStage {
    WriteQuery,
    ExecuteQuery,
    GenerateAnswer,
}

/// Values produced by the pipeline, filled strictly in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlState {
    pub question: String,
    pub query: String,
    pub result: String,
    pub answer: String,
}

/// Structured output of the query-writing step.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct QueryOutput {
    /// Syntactically valid SQL query.
    pub query: String,
}

pub struct SqlAgent {
    model: Arc<dyn ChatModel>,
    db: Arc<dyn QueryRunner>,
    top_k: usize,
}

impl SqlAgent {
    pub fn new(model: Arc<dyn ChatModel>, db: Arc<dyn QueryRunner>) -> Self {
        Self { model, db, top_k: DEFAULT_TOP_K }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Answer `question`. Stops at the first failing stage.
    pub async fn invoke(&self, question: &str) -> Result<SqlState, AgentError> {
        let mut state = SqlState { question: question.to_owned(), ..SqlState::default() };

        state.query = self
            .write_query(&state.question)
            .await
            .map_err(|e| e.in_stage(SqlStage::WriteQuery))?;
        info!(stage = %SqlStage::WriteQuery, query = %state.query, "query written");

        state.result = self
            .execute_query(&state.query)
            .await
            .map_err(|e| e.in_stage(SqlStage::ExecuteQuery))?;
        debug!(stage = %SqlStage::ExecuteQuery, result_len = state.result.len(), "query executed");

        state.answer = self
            .generate_answer(&state)
            .await
            .map_err(|e| e.in_stage(SqlStage::GenerateAnswer))?;
        info!(stage = %SqlStage::GenerateAnswer, answer_len = state.answer.len(), "answer generated");

        Ok(state)
    }

    async fn write_query(&self, question: &str) -> Result<String, AgentError> {
        let table_info = self.db.table_info().await?;
        let prompt = write_query_prompt(self.db.dialect(), self.top_k, &table_info, question)?;
        let output: QueryOutput =
            generate_object(self.model.as_ref(), vec![ModelMessage::user(prompt)]).await?;
        Ok(output.query)
    }

    async fn execute_query(&self, query: &str) -> Result<String, AgentError> {
        let statement = ensure_read_only(query)?;
        Ok(self.db.run(statement).await)
    }

    async fn generate_answer(&self, state: &SqlState) -> Result<String, AgentError> {
        let prompt = generate_answer_prompt(&state.question, &state.query, &state.result);
        Ok(self.model.generate(&ChatRequest::prompt(prompt)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::database::tests::music_db;
    use crate::testing::ScriptedModel;
    use agentdeck_llm::ResponseFormat;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Fixed schema and result; remembers what it was asked to run.
    struct FixedRunner {
        result: String,
        ran: Mutex<Vec<String>>,
    }

    impl FixedRunner {
        fn new(result: &str) -> Self {
            Self { result: result.into(), ran: Mutex::new(Vec::new()) }
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

    #[tokio::test]
    async fn answer_stage_sees_question_query_and_result() {
        let model = Arc::new(ScriptedModel::replying([
            r#"{"query":"SELECT COUNT(*) AS n FROM Artist"}"#,
            "There are 275 artists.",
        ]));
        let runner = Arc::new(FixedRunner::new(r#"[{"n":275}]"#));
        let agent = SqlAgent::new(model.clone(), runner.clone());

        let state = agent.invoke("How many artists are there?").await.unwrap();

        assert_eq!(
            state,
            SqlState {
                question: "How many artists are there?".into(),
                query: "SELECT COUNT(*) AS n FROM Artist".into(),
                result: r#"[{"n":275}]"#.into(),
                answer: "There are 275 artists.".into(),
            }
        );
        assert_eq!(*runner.ran.lock().unwrap(), vec!["SELECT COUNT(*) AS n FROM Artist"]);

        let requests = model.requests();
        assert_eq!(requests.len(), 2);
        assert!(matches!(requests[0].response_format, ResponseFormat::JsonSchema { ref name, .. } if name == "QueryOutput"));
        assert!(requests[0].messages[0].content.contains("CREATE TABLE Artist"));
        assert!(requests[0].messages[0].content.ends_with("Question: How many artists are there?"));
        assert_eq!(
            requests[1].messages,
            vec![ModelMessage::user(
                "Given the following user question, corresponding SQL query, and SQL result, answer the user question.\n\n\
                 Question: How many artists are there?\n\
                 SQL Query: SELECT COUNT(*) AS n FROM Artist\n\
                 SQL Result: [{\"n\":275}]\n"
            )]
        );
        assert_eq!(requests[1].response_format, ResponseFormat::Text);
    }

    #[tokio::test]
    async fn top_k_reaches_the_prompt() {
        let model = Arc::new(ScriptedModel::replying([r#"{"query":"SELECT 1"}"#, "one"]));
        let agent = SqlAgent::new(model.clone(), Arc::new(FixedRunner::new("[]"))).with_top_k(3);
        agent.invoke("q").await.unwrap();
        assert!(model.requests()[0].messages[0].content.contains("at most 3 results"));
    }

    #[tokio::test]
    async fn write_query_rejected_before_execution() {
        let model = Arc::new(ScriptedModel::replying([r#"{"query":"DROP TABLE Artist"}"#]));
        let runner = Arc::new(FixedRunner::new("[]"));
        let agent = SqlAgent::new(model.clone(), runner.clone());

        let err = agent.invoke("delete everything").await.unwrap_err();

        assert_eq!(err.stage(), Some(SqlStage::ExecuteQuery));
        assert!(err.to_string().starts_with("execute_query failed: generated query rejected"));
        assert!(runner.ran.lock().unwrap().is_empty());
        assert_eq!(model.requests().len(), 1, "no answer stage after a failure");
    }

    #[tokio::test]
    async fn model_failure_stops_at_write_query() {
        let model = Arc::new(ScriptedModel::default().then_fail("invalid api key"));
        let runner = Arc::new(FixedRunner::new("[]"));
        let err = SqlAgent::new(model, runner.clone()).invoke("q").await.unwrap_err();

        assert_eq!(err.stage(), Some(SqlStage::WriteQuery));
        assert!(err.to_string().contains("invalid api key"));
        assert!(runner.ran.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn driver_error_text_flows_into_answer() {
        let (_dir, db) = music_db().await;
        let model = Arc::new(ScriptedModel::replying([
            r#"{"query":"SELECT Missing FROM Artist"}"#,
            "I could not find that column.",
        ]));
        let agent = SqlAgent::new(model.clone(), Arc::new(db));

        let state = agent.invoke("q").await.unwrap();

        assert!(state.result.starts_with("Error: "));
        assert!(model.requests()[1].messages[0].content.contains("SQL Result: Error: "));
    }

    #[tokio::test]
    async fn end_to_end_over_sqlite() {
        let (_dir, db) = music_db().await;
        let model = Arc::new(ScriptedModel::replying([
            r#"{"query":"SELECT Name FROM Artist ORDER BY ArtistId LIMIT 2;"}"#,
            "AC/DC and Accept.",
        ]));
        let agent = SqlAgent::new(model.clone(), Arc::new(db));

        let state = agent.invoke("Name two artists").await.unwrap();

        assert_eq!(state.query, "SELECT Name FROM Artist ORDER BY ArtistId LIMIT 2;");
        assert_eq!(state.result, r#"[{"Name":"AC/DC"},{"Name":"Accept"}]"#);
        assert_eq!(state.answer, "AC/DC and Accept.");
        assert!(model.requests()[0].messages[0].content.contains("CREATE TABLE Album"));
    }
}
