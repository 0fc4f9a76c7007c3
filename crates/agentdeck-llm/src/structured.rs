//! Structured output: ask the model for JSON matching a Rust type's schema.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::LlmError;
use crate::message::ModelMessage;
use crate::model::{ChatModel, ChatRequest, ResponseFormat};

/// Invoke `model` with a JSON-schema response format derived from `T` and
/// decode the reply into `T`.
pub async fn generate_object<T>(
    model: &dyn ChatModel,
    messages: Vec<ModelMessage>,
) -> Result<T, LlmError>
where
    T: DeserializeOwned + JsonSchema,
{
    let request = ChatRequest {
        messages,
        response_format: ResponseFormat::JsonSchema {
            name: T::schema_name().into_owned(),
            schema: schema_value::<T>()?,
        },
    };
    let raw = model.generate(&request).await?;
    Ok(serde_json::from_str(strip_code_fences(&raw))?)
}

/// JSON schema of `T` as sent to the provider (without the `$schema` key).
pub fn schema_value<T: JsonSchema>() -> Result<Value, LlmError> {
    let mut value = serde_json::to_value(schemars::schema_for!(T))?;
    if let Some(obj) = value.as_object_mut() {
        obj.remove("$schema");
    }
    Ok(value)
}

/// Some providers wrap JSON in markdown fences even in JSON mode.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
