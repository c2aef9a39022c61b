//! HTTP transport for the chat-completions call.
//!
//! One outbound POST per attempt, with bearer auth and a per-request
//! deadline. When the deadline expires reqwest aborts the in-flight
//! request, so no partial result ever escapes this layer. Retrying is the
//! orchestrator's decision, never the transport's.

use std::time::Duration;

use super::request::RequestEnvelope;

/// A completed HTTP exchange, before classification.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Transport-level failure, before classification.
#[derive(Debug)]
pub(crate) enum TransportError {
    /// The timeout budget expired; the request was cancelled
    Timeout(String),
    /// The connection could not be established or completed
    Network(String),
    /// The response arrived but its body could not be read
    Body(String),
}

/// Perform the HTTP POST and collect status plus body text.
pub(crate) async fn send(
    http: &reqwest::Client,
    url: &str,
    api_key: &str,
    envelope: &RequestEnvelope,
    timeout: Duration,
) -> std::result::Result<RawResponse, TransportError> {
    let response = http
        .post(url)
        .timeout(timeout)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(envelope)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(e.to_string())
            } else {
                TransportError::Network(e.to_string())
            }
        })?;

    let status = response.status().as_u16();
    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else {
            TransportError::Body(e.to_string())
        }
    })?;

    Ok(RawResponse { status, body })
}
