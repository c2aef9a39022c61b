//! Client module - the chat-completion call pipeline
//!
//! This module wires the pipeline together: build and validate the request
//! envelope, perform the bounded HTTP call, classify the outcome, extract
//! reply text, and attach diagnostics metadata. The client is stateless
//! apart from a shared HTTP connection pool, so concurrent calls are
//! independent by construction.
//!
//! # Example
//!
//! ```rust,ignore
//! use llmwire::{CallOptions, ChatClient, ChatMessage, ProviderConfig};
//!
//! async fn example() {
//!     let config = ProviderConfig {
//!         base_url: "https://api.openai.com/v1".to_string(),
//!         api_key: "sk-...".to_string(),
//!         model: "gpt-4o".to_string(),
//!         ..Default::default()
//!     };
//!
//!     let client = ChatClient::new();
//!     let messages = vec![
//!         ChatMessage::system("You are a helpful assistant."),
//!         ChatMessage::user("Hello!"),
//!     ];
//!
//!     match client.call(&config, messages, CallOptions::new()).await {
//!         Ok(result) => println!("{}", result.text),
//!         Err(err) => eprintln!("{}", llmwire::build_diagnostics(&err)),
//!     }
//! }
//! ```

mod classify;
mod diagnostics;
mod extract;
mod request;
mod transport;
mod types;

use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ProviderConfig;
use crate::error::{CallError, ErrorCode, Result};
use crate::utils::string::preview;

use classify::Classification;
use transport::TransportError;

pub use diagnostics::{
    build_diagnostics, Diagnostics, REQUEST_PREVIEW_CHARS, RESPONSE_PREVIEW_CHARS,
};
pub use extract::extract_text;
pub use request::RequestEnvelope;
pub use types::{CallOptions, CallResult, ChatMessage, DEFAULT_TIMEOUT_MS};

/// Per-call identity and timing, shared by every stage of one call.
struct CallContext {
    provider: String,
    model: String,
    request_id: String,
    url: String,
    timeout_ms: u64,
    request_body_preview: String,
    started: Instant,
}

impl CallContext {
    fn new(config: &ProviderConfig, options: &CallOptions, request_body_preview: String) -> Self {
        Self {
            provider: config.provider_name(),
            model: config.model.clone(),
            request_id: options
                .request_id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            url: config.endpoint(),
            timeout_ms: options.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
            request_body_preview,
            started: Instant::now(),
        }
    }

    fn failure(&self, code: ErrorCode, message: impl Into<String>) -> CallError {
        CallError {
            code,
            message: message.into(),
            status: None,
            provider: self.provider.clone(),
            model: self.model.clone(),
            request_id: self.request_id.clone(),
            duration_ms: self.started.elapsed().as_millis() as u64,
            response_text_preview: None,
            request_body_preview: Some(self.request_body_preview.clone()),
            url: Some(self.url.clone()),
            finish_reason: None,
            text_tokens: None,
        }
    }

    fn success(&self, text: String, raw: Value) -> CallResult {
        let output_length = text.chars().count();
        CallResult {
            text,
            raw,
            provider: self.provider.clone(),
            model: self.model.clone(),
            request_id: self.request_id.clone(),
            duration_ms: self.started.elapsed().as_millis() as u64,
            output_length,
        }
    }
}

/// Client for OpenAI-compatible chat-completion endpoints.
///
/// Holds only the HTTP connection pool; cheap to clone and safe to share.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
}

impl Default for ChatClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatClient {
    /// Create a client with a default HTTP client.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Create a client with a custom HTTP client (proxies, pools, TLS).
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Send one chat-completion request and normalize the reply.
    ///
    /// Transient failures (network, parse) are retried once with the
    /// identical envelope; every other failure propagates immediately as a
    /// [`CallError`].
    pub async fn call(
        &self,
        config: &ProviderConfig,
        messages: Vec<ChatMessage>,
        options: CallOptions,
    ) -> Result<CallResult> {
        let envelope = RequestEnvelope::build(config, messages);
        let ctx = CallContext::new(config, &options, envelope.preview_json());
        self.dispatch(&config.api_key, &envelope, ctx).await
    }

    /// Like [`call`](Self::call), for untyped message history (JSON loaded
    /// from the caller's storage).
    ///
    /// The history is checked against the ordered validation rules before
    /// anything goes on the wire; a violation yields
    /// `REQUEST_BUILD_ERROR` without any HTTP request.
    pub async fn call_raw(
        &self,
        config: &ProviderConfig,
        messages: Value,
        options: CallOptions,
    ) -> Result<CallResult> {
        match request::validate_messages(&messages) {
            Ok(typed) => self.call(config, typed, options).await,
            Err(violation) => {
                let body = serde_json::json!({
                    "model": config.model,
                    "messages": messages,
                    "temperature": config.temperature,
                    "max_tokens": config.max_tokens,
                    "stream": false,
                });
                let ctx = CallContext::new(
                    config,
                    &options,
                    preview(&body.to_string(), REQUEST_PREVIEW_CHARS),
                );
                Err(ctx.failure(ErrorCode::RequestBuildError, violation))
            }
        }
    }

    /// Run the attempt, retrying once for transient failures.
    async fn dispatch(
        &self,
        api_key: &str,
        envelope: &RequestEnvelope,
        mut ctx: CallContext,
    ) -> Result<CallResult> {
        match self.attempt(api_key, envelope, &ctx).await {
            Err(err) if err.code.should_retry() => {
                warn!(
                    provider = %ctx.provider,
                    request_id = %ctx.request_id,
                    code = %err.code,
                    error = %err,
                    "retrying chat call after transient failure"
                );
                ctx.started = Instant::now();
                self.attempt(api_key, envelope, &ctx).await
            }
            other => other,
        }
    }

    /// One transport round-trip plus classification.
    async fn attempt(
        &self,
        api_key: &str,
        envelope: &RequestEnvelope,
        ctx: &CallContext,
    ) -> Result<CallResult> {
        debug!(
            provider = %ctx.provider,
            model = %ctx.model,
            request_id = %ctx.request_id,
            "dispatching chat-completion request"
        );

        let raw = match transport::send(
            &self.http,
            &ctx.url,
            api_key,
            envelope,
            Duration::from_millis(ctx.timeout_ms),
        )
        .await
        {
            Ok(raw) => raw,
            Err(TransportError::Timeout(_)) => {
                return Err(ctx.failure(ErrorCode::Timeout, "request timed out"));
            }
            Err(TransportError::Network(message)) => {
                return Err(ctx.failure(ErrorCode::NetworkError, message));
            }
            Err(TransportError::Body(message)) => {
                return Err(ctx.failure(
                    ErrorCode::ParseError,
                    format!("failed to read response body: {}", message),
                ));
            }
        };

        match classify::classify(raw.status, &raw.body) {
            Classification::Success { text, raw: parsed } => {
                let result = ctx.success(text, parsed);
                info!(
                    provider = %ctx.provider,
                    model = %ctx.model,
                    request_id = %ctx.request_id,
                    duration_ms = result.duration_ms,
                    output_length = result.output_length,
                    "chat-completion reply received"
                );
                Ok(result)
            }
            Classification::Failure {
                code,
                message,
                finish_reason,
                text_tokens,
            } => {
                let mut err = ctx.failure(code, message);
                err.status = Some(raw.status);
                err.response_text_preview = Some(preview(&raw.body, RESPONSE_PREVIEW_CHARS));
                err.finish_reason = finish_reason;
                err.text_tokens = text_tokens;
                Err(err)
            }
        }
    }
}
