//! Error types for llmwire
//!
//! This module defines the error taxonomy for LLM calls. Every failed call
//! produces exactly one [`CallError`] tagged with an [`ErrorCode`], enabling
//! retry and display decisions without string matching.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Error Codes
// ============================================================================

/// Stable classification of call failures.
///
/// Codes serialize to their wire names (`REQUEST_BUILD_ERROR`, `TIMEOUT`,
/// ...) so diagnostics snapshots stay stable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed messages/content/role detected before send
    RequestBuildError,
    /// Connection-level failure (DNS, TLS, refused, reset)
    NetworkError,
    /// The timeout budget expired and the request was cancelled
    Timeout,
    /// Non-2xx response, not auth-related
    HttpError,
    /// 401/403/451 — credentials or access problem
    Blocked,
    /// The provider's content filter stopped generation
    SafetyFilter,
    /// Empty text with a length-truncated finish reason
    EmptyTruncated,
    /// Empty or unusable text for any other reason
    EmptyContent,
    /// The response body could not be interpreted at all
    ParseError,
}

impl ErrorCode {
    /// The wire name of this code, as it appears in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::RequestBuildError => "REQUEST_BUILD_ERROR",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::HttpError => "HTTP_ERROR",
            ErrorCode::Blocked => "BLOCKED",
            ErrorCode::SafetyFilter => "SAFETY_FILTER",
            ErrorCode::EmptyTruncated => "EMPTY_TRUNCATED",
            ErrorCode::EmptyContent => "EMPTY_CONTENT",
            ErrorCode::ParseError => "PARSE_ERROR",
        }
    }

    /// Returns `true` if the core should transparently retry the call once.
    ///
    /// Only parse failures and network-level failures qualify. Other codes
    /// (including `Timeout`) propagate immediately; whether to retry those
    /// is the caller's decision.
    pub fn should_retry(&self) -> bool {
        matches!(self, ErrorCode::ParseError | ErrorCode::NetworkError)
    }

    /// Returns `true` if the caller should avoid persisting a visible error
    /// message for this failure (empty output rather than a hard fault).
    pub fn is_silent(&self) -> bool {
        matches!(self, ErrorCode::EmptyTruncated | ErrorCode::EmptyContent)
    }

    /// A stable, user-facing message for this code.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorCode::RequestBuildError => {
                "Request could not be built, check the message payload"
            }
            ErrorCode::NetworkError => {
                "Network failure, check the base URL, connectivity, or proxy settings"
            }
            ErrorCode::Timeout => "Request timed out, retry later or reduce the load",
            ErrorCode::HttpError => "The endpoint returned an error, see the server message",
            ErrorCode::Blocked => "Request was blocked, check credentials or access permissions",
            ErrorCode::SafetyFilter => "Content was stopped by the safety filter, adjust the input",
            ErrorCode::EmptyTruncated => {
                "Empty content after truncation, shorten the input or raise max tokens"
            }
            ErrorCode::EmptyContent => {
                "Empty content returned, check the input or the endpoint response"
            }
            ErrorCode::ParseError => {
                "Response could not be parsed, check the response structure or switch endpoints"
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Call Error
// ============================================================================

/// A failed LLM call.
///
/// Carries the classification tag plus a fixed metadata set; optional fields
/// are populated when the failure stage had them available. Previews are
/// bounded (response ≤ 500 chars, request body ≤ 800 chars) and never
/// contain the API key, which travels only in request headers.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{code}: {message}")]
pub struct CallError {
    /// Classification tag
    pub code: ErrorCode,
    /// Human-readable description (server message when one was recovered)
    pub message: String,
    /// HTTP status, when a response was received
    pub status: Option<u16>,
    /// Provider name (label override or endpoint host)
    pub provider: String,
    /// Model identifier the call targeted
    pub model: String,
    /// Caller-supplied or generated request id
    pub request_id: String,
    /// Wall time from just before dispatch to classification
    pub duration_ms: u64,
    /// Bounded excerpt of the response body
    pub response_text_preview: Option<String>,
    /// Bounded excerpt of the serialized request envelope
    pub request_body_preview: Option<String>,
    /// Full request URL
    pub url: Option<String>,
    /// Provider finish reason, when the body carried one
    pub finish_reason: Option<String>,
    /// Output token count, when the body carried usage data
    pub text_tokens: Option<u64>,
}

impl CallError {
    /// Create an error with the given code and message and empty metadata.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            provider: String::new(),
            model: String::new(),
            request_id: String::new(),
            duration_ms: 0,
            response_text_preview: None,
            request_body_preview: None,
            url: None,
            finish_reason: None,
            text_tokens: None,
        }
    }

    /// Returns `true` if the caller should skip recording a visible error.
    ///
    /// Extends [`ErrorCode::is_silent`] with the zero-output truncation case:
    /// a length-truncated reply that produced no tokens at all.
    pub fn is_silent(&self) -> bool {
        if self.code.is_silent() {
            return true;
        }
        self.finish_reason.as_deref() == Some("length") && self.text_tokens == Some(0)
    }
}

/// A specialized `Result` type for llmwire operations.
pub type Result<T> = std::result::Result<T, CallError>;
