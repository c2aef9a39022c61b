//! Core types for the call pipeline
//!
//! This module defines the chat message, per-call options, and the
//! successful call result. Failure types live in [`crate::error`].

use serde::{Deserialize, Serialize};

/// Default per-call timeout budget in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 120_000;

/// A single message in the conversation history.
///
/// The role travels as a string on the wire; the constructors cover the
/// three roles the envelope uses. `content` must be plain text — rich
/// content parts are a response-side concern handled by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user", or "assistant"
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a message with an arbitrary role.
    pub fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    /// Create a system message.
    pub fn system(content: &str) -> Self {
        Self::new("system", content)
    }

    /// Create a user message.
    pub fn user(content: &str) -> Self {
        Self::new("user", content)
    }

    /// Create an assistant message.
    pub fn assistant(content: &str) -> Self {
        Self::new("assistant", content)
    }
}

/// Per-call options.
///
/// Use the builder pattern to construct options.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Timeout budget in milliseconds (default [`DEFAULT_TIMEOUT_MS`])
    pub timeout_ms: Option<u64>,
    /// Request id override; a UUID v4 is generated when unset
    pub request_id: Option<String>,
}

impl CallOptions {
    /// Create new default call options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout budget in milliseconds.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Set an explicit request id for correlation with caller-side logs.
    pub fn with_request_id(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }
}

/// A successful LLM call.
#[derive(Debug, Clone, Serialize)]
pub struct CallResult {
    /// Extracted reply text, trimmed, guaranteed non-empty
    pub text: String,
    /// The parsed response body, or the raw body string for plain-text replies
    pub raw: serde_json::Value,
    /// Provider name (label override or endpoint host)
    pub provider: String,
    /// Model identifier the call targeted
    pub model: String,
    /// Caller-supplied or generated request id
    pub request_id: String,
    /// Wall time from dispatch to classification
    pub duration_ms: u64,
    /// Character count of `text`
    pub output_length: usize,
}
