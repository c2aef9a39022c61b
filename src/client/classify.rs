//! Response classification.
//!
//! Pure mapping from `(status, body text)` to a success or a typed failure.
//! Keeping the classifier free of timing/identity metadata makes it
//! idempotent: the same input pair always yields the same code and message.
//! The orchestrator attaches request ids, durations, and previews afterward.
//!
//! Safety-filter detection is a best-effort heuristic over loosely-typed
//! finish-reason fields; a filtered reply the patterns miss surfaces as
//! `EMPTY_CONTENT`, never as a false success.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::ErrorCode;

use super::extract::{extract_text, extract_text_tokens, finish_reason};

/// Finish reasons and error codes that indicate provider-side filtering.
static FILTER_OR_SAFETY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)content_filter|safety").expect("valid regex"));

/// Gemini candidate finish reasons use bare safety markers.
static SAFETY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)safety").expect("valid regex"));

/// Outcome of classifying one `(status, body)` pair.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Classification {
    /// Usable reply text was found
    Success {
        /// Trimmed, non-empty reply text
        text: String,
        /// Parsed body, or the raw string for plain-text replies
        raw: Value,
    },
    /// The call failed; metadata still to be attached by the orchestrator
    Failure {
        code: ErrorCode,
        message: String,
        finish_reason: Option<String>,
        text_tokens: Option<u64>,
    },
}

impl Classification {
    fn failure(code: ErrorCode, message: &str) -> Self {
        Classification::Failure {
            code,
            message: message.to_string(),
            finish_reason: None,
            text_tokens: None,
        }
    }
}

/// Classify a completed HTTP exchange. First match wins:
///
/// 1. non-2xx status → `BLOCKED` (401/403/451) or `HTTP_ERROR`, with the
///    server's own message when the body carries one
/// 2. JSON body → safety check, then extraction; blank text splits into
///    `EMPTY_TRUNCATED` (length-limited) and `EMPTY_CONTENT`
/// 3. non-JSON, non-blank body → the body is the reply (plain-text servers)
/// 4. anything else → `EMPTY_CONTENT`
pub(crate) fn classify(status: u16, body: &str) -> Classification {
    if !(200..300).contains(&status) {
        let message = parse_error_message(body)
            .unwrap_or_else(|| format!("HTTP {}", status));
        let code = if matches!(status, 401 | 403 | 451) {
            ErrorCode::Blocked
        } else {
            ErrorCode::HttpError
        };
        return Classification::failure(code, &message);
    }

    if let Ok(data) = serde_json::from_str::<Value>(body) {
        if detect_safety_filtered(&data) {
            return Classification::failure(
                ErrorCode::SafetyFilter,
                "content stopped by the provider safety filter",
            );
        }

        let text = extract_text(&data);
        if text.trim().is_empty() {
            let reason = finish_reason(&data);
            let tokens = extract_text_tokens(&data);
            let (code, message) = if reason.as_deref() == Some("length") {
                (
                    ErrorCode::EmptyTruncated,
                    "empty content, truncated by the length limit",
                )
            } else {
                (ErrorCode::EmptyContent, "empty content, filtered or truncated")
            };
            return Classification::Failure {
                code,
                message: message.to_string(),
                finish_reason: reason,
                text_tokens: tokens,
            };
        }

        return Classification::Success {
            text: text.trim().to_string(),
            raw: data,
        };
    }

    let fallback = body.trim();
    if !fallback.is_empty() {
        // Some deployments answer with the bare reply instead of JSON
        return Classification::Success {
            text: fallback.to_string(),
            raw: Value::String(body.to_string()),
        };
    }

    Classification::failure(ErrorCode::EmptyContent, "empty response body")
}

/// Recover a human-readable message from an error body.
///
/// Probes `error.message`, `message`, `error`, `detail` in that priority,
/// taking string values only.
pub(crate) fn parse_error_message(body: &str) -> Option<String> {
    let data: Value = serde_json::from_str(body).ok()?;
    let candidates = [
        data.pointer("/error/message"),
        data.get("message"),
        data.get("error"),
        data.get("detail"),
    ];
    let found = candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str().filter(|s| !s.is_empty()))
        .map(str::to_string);
    found
}

/// Best-effort detection of provider-side content filtering.
fn detect_safety_filtered(data: &Value) -> bool {
    if let Some(reason) = data
        .pointer("/choices/0/finish_reason")
        .and_then(Value::as_str)
    {
        if FILTER_OR_SAFETY_RE.is_match(reason) {
            return true;
        }
    }
    if let Some(reason) = data
        .pointer("/candidates/0/finishReason")
        .and_then(Value::as_str)
    {
        if SAFETY_RE.is_match(reason) {
            return true;
        }
    }
    if let Some(code) = data.pointer("/error/code").and_then(Value::as_str) {
        if FILTER_OR_SAFETY_RE.is_match(code) {
            return true;
        }
    }
    false
}
