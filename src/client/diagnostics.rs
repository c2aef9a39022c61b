//! Diagnostics snapshots for failed calls.
//!
//! Produces a bounded, JSON-serializable view of a [`CallError`] that a UI
//! can show or copy verbatim. The snapshot carries everything needed to
//! troubleshoot an endpoint (previews, status, timing, correlation id) and
//! nothing secret: the API key travels only in request headers, which no
//! stage of the pipeline records.

use serde::Serialize;

use crate::error::CallError;

/// Maximum characters of response body kept in previews.
pub const RESPONSE_PREVIEW_CHARS: usize = 500;

/// Maximum characters of serialized request body kept in previews.
pub const REQUEST_PREVIEW_CHARS: usize = 800;

/// A display-safe snapshot of one failed call.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    /// Human-readable failure description
    pub message: String,
    /// Wire name of the error code
    pub code: String,
    /// HTTP status, when a response was received
    pub status: Option<u16>,
    /// Provider name
    pub provider: String,
    /// Model identifier
    pub model: String,
    /// Correlation id
    pub request_id: String,
    /// Wall time of the failed attempt
    pub duration_ms: u64,
    /// Bounded response body excerpt
    pub response_text_preview: String,
    /// Bounded request body excerpt
    pub request_body_preview: String,
    /// Full request URL
    pub url: String,
}

impl From<&CallError> for Diagnostics {
    fn from(error: &CallError) -> Self {
        Self {
            message: error.message.clone(),
            code: error.code.as_str().to_string(),
            status: error.status,
            provider: error.provider.clone(),
            model: error.model.clone(),
            request_id: error.request_id.clone(),
            duration_ms: error.duration_ms,
            response_text_preview: error.response_text_preview.clone().unwrap_or_default(),
            request_body_preview: error.request_body_preview.clone().unwrap_or_default(),
            url: error.url.clone().unwrap_or_default(),
        }
    }
}

/// Render the diagnostics snapshot as pretty-printed JSON.
///
/// Deterministic for a given error: field order is fixed by the struct.
pub fn build_diagnostics(error: &CallError) -> String {
    serde_json::to_string_pretty(&Diagnostics::from(error)).unwrap_or_default()
}
