//! Server configuration, loaded from environment variables at startup.

use std::path::PathBuf;
use std::time::Duration;

use agentdeck_llm::OpenAiConfig;

/// Runtime configuration for agentdeck-server.
///
/// Every field except the API key has a default, so the pages and health
/// check work with no environment at all.
#[derive(Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated CORS origins; `None` allows any origin.
    pub cors_allowed_origins: Option<String>,

    /// Serve `/api-docs/openapi.json`.
    pub enable_api_docs: bool,

    /// SQLite file queried by the SQL agent. Opened read-only on first use.
    pub sql_database: PathBuf,

    /// Result limit the query-writing prompt asks the model to respect.
    pub sql_top_k: usize,

    /// Rows captured from one query.
    pub sql_max_rows: usize,

    /// Hosted-model credential. Agent endpoints answer 500 without it.
    pub openai_api_key: Option<String>,

    pub openai_base_url: String,

    pub model: String,

    pub temperature: f32,

    pub model_timeout: Duration,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());
        Self {
            bind_address: env_or("AGENTDECK_BIND", "0.0.0.0:3000"),
            log_level: env_or("AGENTDECK_LOG", "info"),
            log_json: parse_flag(lookup("AGENTDECK_LOG_JSON"), false),
            cors_allowed_origins: non_blank(lookup("AGENTDECK_CORS_ORIGINS")),
            enable_api_docs: parse_flag(lookup("AGENTDECK_ENABLE_API_DOCS"), true),
            sql_database: PathBuf::from(env_or("AGENTDECK_SQL_DATABASE", "Chinook.db")),
            sql_top_k: parse_or(lookup("AGENTDECK_SQL_TOP_K"), 10),
            sql_max_rows: parse_or(lookup("AGENTDECK_SQL_MAX_ROWS"), 100),
            openai_api_key: non_blank(lookup("OPENAI_API_KEY")),
            openai_base_url: env_or("OPENAI_BASE_URL", agentdeck_llm::openai::DEFAULT_BASE_URL),
            model: env_or("AGENTDECK_MODEL", agentdeck_llm::openai::DEFAULT_MODEL),
            temperature: parse_or(lookup("AGENTDECK_TEMPERATURE"), 0.0),
            model_timeout: Duration::from_secs(parse_or(lookup("AGENTDECK_MODEL_TIMEOUT_SECS"), 120)),
        }
    }

    /// Settings for the hosted model, if a key is configured.
    pub fn openai(&self) -> Option<OpenAiConfig> {
        let api_key = self.openai_api_key.clone()?;
        Some(OpenAiConfig {
            base_url: self.openai_base_url.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            timeout: self.model_timeout,
            ..OpenAiConfig::new(api_key)
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("log_level", &self.log_level)
            .field("log_json", &self.log_json)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("enable_api_docs", &self.enable_api_docs)
            .field("sql_database", &self.sql_database)
            .field("sql_top_k", &self.sql_top_k)
            .field("sql_max_rows", &self.sql_max_rows)
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("openai_base_url", &self.openai_base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("model_timeout", &self.model_timeout)
            .finish()
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn parse_flag(value: Option<String>, default: bool) -> bool {
    match value {
        Some(v) => v == "1" || v.eq_ignore_ascii_case("true"),
        None => default,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
