//! Request envelope construction and message validation.
//!
//! The envelope is derived deterministically from the provider config and
//! the conversation history. Typed callers cannot produce an invalid
//! envelope; JSON ingress (history loaded from the caller's storage) is
//! checked by [`validate_messages`] before anything goes on the wire, with
//! the first violation winning.

use serde::Serialize;
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::utils::string::preview;

use super::diagnostics::REQUEST_PREVIEW_CHARS;
use super::types::ChatMessage;

/// The wire-level request body for `POST {base_url}/chat/completions`.
///
/// Ephemeral: built per call, serialized once, and dropped.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope {
    /// Model identifier
    pub model: String,
    /// Conversation messages, system prompt included
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    pub temperature: f32,
    /// Generation budget in tokens
    pub max_tokens: u32,
    /// Always `false`; streaming is out of scope
    pub stream: bool,
}

impl RequestEnvelope {
    /// Build the envelope for one call. Same inputs, same envelope.
    pub fn build(config: &ProviderConfig, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: config.model.clone(),
            messages,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            stream: false,
        }
    }

    /// Bounded preview of the serialized body for diagnostics (≤ 800 chars).
    ///
    /// The API key travels in headers, never in the body, so the preview is
    /// safe to surface.
    pub fn preview_json(&self) -> String {
        let body = serde_json::to_string(self).unwrap_or_default();
        preview(&body, REQUEST_PREVIEW_CHARS)
    }
}

/// The JSON type name of a value, for validation details.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validate untyped message history and convert it to typed messages.
///
/// Rules are checked in order; the first violation wins:
/// 1. `messages` must be a JSON array
/// 2. each element must be an object
/// 3. each element's `content` must be a string
/// 4. each element's `role` must be a string
///
/// The returned string names the violation and the observed type so callers
/// can repair their stored history.
pub(crate) fn validate_messages(
    messages: &Value,
) -> std::result::Result<Vec<ChatMessage>, String> {
    let items = match messages.as_array() {
        Some(items) => items,
        None => {
            return Err(format!(
                "messages is not an array (got {})",
                json_type_name(messages)
            ));
        }
    };

    let mut typed = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let obj = match item.as_object() {
            Some(obj) => obj,
            None => {
                return Err(format!(
                    "messages is malformed (messages[{}] is {})",
                    index,
                    json_type_name(item)
                ));
            }
        };
        let content = match obj.get("content").and_then(Value::as_str) {
            Some(content) => content,
            None => {
                let observed = obj.get("content").map_or("missing", json_type_name);
                return Err(format!(
                    "content is not a string (messages[{}].content is {})",
                    index, observed
                ));
            }
        };
        let role = match obj.get("role").and_then(Value::as_str) {
            Some(role) => role,
            None => {
                let observed = obj.get("role").map_or("missing", json_type_name);
                return Err(format!(
                    "role is not a string (messages[{}].role is {})",
                    index, observed
                ));
            }
        };
        typed.push(ChatMessage::new(role, content));
    }

    Ok(typed)
}
