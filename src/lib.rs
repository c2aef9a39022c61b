//! llmwire - Chat-completion call normalization and error classification
//!
//! Sends a chat-completion request to an OpenAI-compatible endpoint,
//! tolerates heterogeneous response shapes, classifies failures into a
//! stable taxonomy, and produces bounded diagnostics for troubleshooting.

pub mod client;
pub mod config;
pub mod error;
pub mod utils;

pub use client::{
    build_diagnostics, extract_text, CallOptions, CallResult, ChatClient, ChatMessage,
    Diagnostics, RequestEnvelope, DEFAULT_TIMEOUT_MS, REQUEST_PREVIEW_CHARS,
    RESPONSE_PREVIEW_CHARS,
};
pub use config::{LogFormat, LoggingConfig, ProviderConfig};
pub use error::{CallError, ErrorCode, Result};
