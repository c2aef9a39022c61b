//! Configuration types for llmwire
//!
//! Provider settings are owned by the caller and passed by reference per
//! call; the core never mutates them. All types implement serde traits with
//! sensible defaults, and environment variables can override provider
//! fields using the `LLMWIRE_*` pattern.

use serde::{Deserialize, Serialize};

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default generation budget in tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 8192;

// ============================================================================
// Provider Configuration
// ============================================================================

/// Connection settings for one OpenAI-compatible endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Endpoint base URL (trailing slashes are stripped before use)
    pub base_url: String,
    /// API key, sent as a bearer token. Never echoed into errors or logs.
    pub api_key: String,
    /// Model identifier to request
    pub model: String,
    /// Sampling temperature, valid range 0.0 to 2.0
    pub temperature: f32,
    /// Generation budget in tokens
    pub max_tokens: u32,
    /// Display name override; when unset the endpoint host is used
    pub provider_label: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            model: String::new(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            provider_label: None,
        }
    }
}

impl ProviderConfig {
    /// Load provider settings from `LLMWIRE_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Recognized variables: `LLMWIRE_BASE_URL`, `LLMWIRE_API_KEY`,
    /// `LLMWIRE_MODEL`, `LLMWIRE_TEMPERATURE`, `LLMWIRE_MAX_TOKENS`,
    /// `LLMWIRE_PROVIDER_LABEL`. Unparseable numeric values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LLMWIRE_BASE_URL") {
            self.base_url = val;
        }
        if let Ok(val) = std::env::var("LLMWIRE_API_KEY") {
            self.api_key = val;
        }
        if let Ok(val) = std::env::var("LLMWIRE_MODEL") {
            self.model = val;
        }
        if let Ok(val) = std::env::var("LLMWIRE_TEMPERATURE") {
            if let Ok(parsed) = val.parse::<f32>() {
                self.temperature = parsed;
            }
        }
        if let Ok(val) = std::env::var("LLMWIRE_MAX_TOKENS") {
            if let Ok(parsed) = val.parse::<u32>() {
                self.max_tokens = parsed;
            }
        }
        if let Ok(val) = std::env::var("LLMWIRE_PROVIDER_LABEL") {
            self.provider_label = Some(val);
        }
    }

    /// Check the configuration for values that cannot produce a valid call.
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("base_url is empty".to_string());
        }
        if self.api_key.trim().is_empty() {
            return Err("api_key is empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model is empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature {} outside valid range 0.0..=2.0",
                self.temperature
            ));
        }
        if self.max_tokens == 0 {
            return Err("max_tokens is zero".to_string());
        }
        Ok(())
    }

    /// The display name for this endpoint.
    ///
    /// Falls back label -> URL host -> raw base_url -> "unknown".
    pub fn provider_name(&self) -> String {
        if let Some(label) = &self.provider_label {
            if !label.is_empty() {
                return label.clone();
            }
        }
        if let Ok(url) = reqwest::Url::parse(&self.base_url) {
            if let Some(host) = url.host_str() {
                return host.to_string();
            }
        }
        if !self.base_url.is_empty() {
            return self.base_url.clone();
        }
        "unknown".to_string()
    }

    /// The full chat-completions URL for this endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Default tracing pretty-print, human-readable
    Pretty,
    /// Single-line compact text, grep-friendly
    Compact,
    /// Structured JSON lines for log aggregators
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// Default filter level when `RUST_LOG` is unset
    pub level: String,
    /// Optional log file path; stderr when unset
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Compact,
            level: "info".to_string(),
            file: None,
        }
    }
}
