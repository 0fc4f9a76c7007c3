use thiserror::Error;

/// Failures talking to a hosted chat model.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No credential configured; raised before any network traffic.
    #[error("OpenAI API key is missing")]
    MissingApiKey,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("model API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("model response contained no choices")]
    EmptyResponse,

    #[error("model refused the request: {0}")]
    Refusal(String),

    /// Structured output could not be decoded into the requested type.
    #[error("invalid structured output: {0}")]
    Structured(#[from] serde_json::Error),
}

impl LlmError {
    /// Build an [`LlmError::Api`] from a raw error body, preferring the
    /// provider's `error.message` field when the body is JSON.
    pub fn api(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| body.trim().to_owned());
        LlmError::Api { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_extracts_provider_message() {
        let err = LlmError::api(401, r#"{"error":{"message":"Incorrect API key"}}"#);
        assert_eq!(err.to_string(), "model API returned status 401: Incorrect API key");
    }

    #[test]
    fn api_error_keeps_plain_bodies() {
        let err = LlmError::api(502, " bad gateway \n");
        assert!(matches!(err, LlmError::Api { status: 502, ref message } if message == "bad gateway"));
    }
}
