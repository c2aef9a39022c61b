//! Integration tests for llmwire
//!
//! These tests drive the full call pipeline against a mock HTTP server:
//! envelope dispatch, response classification, text extraction across
//! provider shapes, bounded diagnostics, and the retry/no-retry policy
//! (verified through mock call counting).

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use llmwire::{
    build_diagnostics, CallOptions, ChatClient, ChatMessage, ErrorCode, ProviderConfig,
    REQUEST_PREVIEW_CHARS, RESPONSE_PREVIEW_CHARS,
};

const API_KEY: &str = "sk-secret-test-key-000";

fn config_for(server: &MockServer) -> ProviderConfig {
    ProviderConfig {
        base_url: server.uri(),
        api_key: API_KEY.to_string(),
        model: "test-model".to_string(),
        temperature: 0.7,
        max_tokens: 256,
        provider_label: None,
    }
}

fn user_messages() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("You are a helpful assistant."),
        ChatMessage::user("Hello!"),
    ]
}

// ============================================================================
// Success Paths
// ============================================================================

#[tokio::test]
async fn test_openai_shape_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "hello"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = ChatClient::new()
        .call(&config_for(&server), user_messages(), CallOptions::new())
        .await
        .unwrap();

    assert_eq!(result.text, "hello");
    assert_eq!(result.model, "test-model");
    assert_eq!(result.output_length, 5);
    assert!(!result.request_id.is_empty());
    assert!(result.raw.is_object());
}

#[tokio::test]
async fn test_anthropic_shape_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "claude says hi"}]
        })))
        .mount(&server)
        .await;

    let result = ChatClient::new()
        .call(&config_for(&server), user_messages(), CallOptions::new())
        .await
        .unwrap();

    assert_eq!(result.text, "claude says hi");
}

#[tokio::test]
async fn test_gemini_shape_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "gemini says hi"}]}}]
        })))
        .mount(&server)
        .await;

    let result = ChatClient::new()
        .call(&config_for(&server), user_messages(), CallOptions::new())
        .await
        .unwrap();

    assert_eq!(result.text, "gemini says hi");
}

#[tokio::test]
async fn test_plain_text_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .mount(&server)
        .await;

    let result = ChatClient::new()
        .call(&config_for(&server), user_messages(), CallOptions::new())
        .await
        .unwrap();

    assert_eq!(result.text, "pong");
    assert_eq!(result.raw, serde_json::Value::String("pong".to_string()));
}

#[tokio::test]
async fn test_provider_name_and_request_id_override() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "ok"}}]
        })))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.provider_label = Some("staging-relay".to_string());
    let options = CallOptions::new().with_request_id("req-override");

    let result = ChatClient::new()
        .call(&config, user_messages(), options)
        .await
        .unwrap();

    assert_eq!(result.provider, "staging-relay");
    assert_eq!(result.request_id, "req-override");
}

#[tokio::test]
async fn test_call_raw_accepts_stored_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "from raw"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let messages = json!([
        {"role": "system", "content": "be brief"},
        {"role": "user", "content": "hi"}
    ]);
    let result = ChatClient::new()
        .call_raw(&config_for(&server), messages, CallOptions::new())
        .await
        .unwrap();

    assert_eq!(result.text, "from raw");
}

// ============================================================================
// Error Classification
// ============================================================================

#[tokio::test]
async fn test_blocked_on_invalid_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "invalid api key"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = ChatClient::new()
        .call(&config_for(&server), user_messages(), CallOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::Blocked);
    assert_eq!(err.message, "invalid api key");
    assert_eq!(err.status, Some(401));
}

#[tokio::test]
async fn test_http_error_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "message": "rate limit exceeded"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = ChatClient::new()
        .call(&config_for(&server), user_messages(), CallOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::HttpError);
    assert_eq!(err.message, "rate limit exceeded");
    assert_eq!(err.status, Some(429));
}

#[tokio::test]
async fn test_http_error_fallback_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string(""))
        .mount(&server)
        .await;

    let err = ChatClient::new()
        .call(&config_for(&server), user_messages(), CallOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::HttpError);
    assert_eq!(err.message, "HTTP 500");
}

#[tokio::test]
async fn test_empty_truncated_on_length_finish() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": ""}, "finish_reason": "length"}],
            "usage": {"completion_tokens": 0}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = ChatClient::new()
        .call(&config_for(&server), user_messages(), CallOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::EmptyTruncated);
    assert_eq!(err.finish_reason.as_deref(), Some("length"));
    assert_eq!(err.text_tokens, Some(0));
    assert!(err.is_silent());
}

#[tokio::test]
async fn test_safety_filter_detected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": ""}, "finish_reason": "content_filter"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = ChatClient::new()
        .call(&config_for(&server), user_messages(), CallOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::SafetyFilter);
    assert!(!err.is_silent());
}

#[tokio::test]
async fn test_timeout_on_slow_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": [{"message": {"content": "late"}}]}))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let options = CallOptions::new().with_timeout_ms(100);
    let err = ChatClient::new()
        .call(&config_for(&server), user_messages(), options)
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::Timeout);
    assert!(err.status.is_none());
}

#[tokio::test]
async fn test_network_error_on_unreachable_endpoint() {
    let config = ProviderConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        api_key: API_KEY.to_string(),
        model: "test-model".to_string(),
        ..Default::default()
    };

    let err = ChatClient::new()
        .call(&config, user_messages(), CallOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::NetworkError);
    assert!(!err.message.is_empty());
    assert_eq!(err.provider, "127.0.0.1");
}

// ============================================================================
// Request Build Validation
// ============================================================================

#[tokio::test]
async fn test_build_error_makes_no_http_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("unreachable"))
        .expect(0)
        .mount(&server)
        .await;

    // messages as a plain object instead of a sequence
    let err = ChatClient::new()
        .call_raw(
            &config_for(&server),
            json!({"role": "user", "content": "hi"}),
            CallOptions::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::RequestBuildError);
    assert!(err.message.contains("not an array"));
    assert!(err.status.is_none());
    assert!(err.request_body_preview.is_some());
}

#[tokio::test]
async fn test_build_error_reports_offending_index() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("unreachable"))
        .expect(0)
        .mount(&server)
        .await;

    let messages = json!([
        {"role": "user", "content": "fine"},
        {"role": "user", "content": {"not": "a string"}}
    ]);
    let err = ChatClient::new()
        .call_raw(&config_for(&server), messages, CallOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::RequestBuildError);
    assert!(err.message.contains("content is not a string"));
    assert!(err.message.contains("messages[1]"));
}

// ============================================================================
// Bounded Previews & Secret Handling
// ============================================================================

#[tokio::test]
async fn test_response_preview_bounded_to_500_chars() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("x".repeat(5_000)))
        .mount(&server)
        .await;

    let err = ChatClient::new()
        .call(&config_for(&server), user_messages(), CallOptions::new())
        .await
        .unwrap_err();

    let preview = err.response_text_preview.unwrap();
    assert_eq!(preview.chars().count(), RESPONSE_PREVIEW_CHARS);
}

#[tokio::test]
async fn test_request_preview_bounded_to_800_chars() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let messages = vec![ChatMessage::user(&"y".repeat(5_000))];
    let err = ChatClient::new()
        .call(&config_for(&server), messages, CallOptions::new())
        .await
        .unwrap_err();

    let preview = err.request_body_preview.unwrap();
    assert_eq!(preview.chars().count(), REQUEST_PREVIEW_CHARS);
}

#[tokio::test]
async fn test_api_key_never_leaks_into_errors_or_diagnostics() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "invalid api key"}
        })))
        .mount(&server)
        .await;

    let err = ChatClient::new()
        .call(&config_for(&server), user_messages(), CallOptions::new())
        .await
        .unwrap_err();

    let error_json = serde_json::to_string(&err).unwrap();
    assert!(!error_json.contains(API_KEY));

    let diagnostics = build_diagnostics(&err);
    assert!(!diagnostics.contains(API_KEY));
}

// ============================================================================
// Diagnostics
// ============================================================================

#[tokio::test]
async fn test_diagnostics_snapshot_from_real_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": {"message": "overloaded"}
        })))
        .mount(&server)
        .await;

    let options = CallOptions::new().with_request_id("diag-req");
    let err = ChatClient::new()
        .call(&config_for(&server), user_messages(), options)
        .await
        .unwrap_err();

    let parsed: serde_json::Value = serde_json::from_str(&build_diagnostics(&err)).unwrap();
    assert_eq!(parsed["code"], "HTTP_ERROR");
    assert_eq!(parsed["message"], "overloaded");
    assert_eq!(parsed["status"], 503);
    assert_eq!(parsed["request_id"], "diag-req");
    assert!(parsed["url"]
        .as_str()
        .unwrap()
        .ends_with("/chat/completions"));
    assert!(parsed["request_body_preview"]
        .as_str()
        .unwrap()
        .contains("test-model"));
}

// ============================================================================
// Retry Policy
// ============================================================================

#[tokio::test]
async fn test_no_retry_on_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("server error"))
        .expect(1)
        .mount(&server)
        .await;

    let err = ChatClient::new()
        .call(&config_for(&server), user_messages(), CallOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::HttpError);
}

#[tokio::test]
async fn test_no_retry_on_empty_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": ""}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = ChatClient::new()
        .call(&config_for(&server), user_messages(), CallOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::EmptyContent);
    assert!(err.is_silent());
}

#[tokio::test]
async fn test_single_flat_wire_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "ok"}}]
        })))
        .mount(&server)
        .await;

    ChatClient::new()
        .call(&config_for(&server), user_messages(), CallOptions::new())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["model"], "test-model");
    assert_eq!(body["stream"], false);
    assert_eq!(body["max_tokens"], 256);
    assert_eq!(body["messages"][1]["content"], "Hello!");
    let auth = requests[0]
        .headers
        .get("authorization")
        .map(|v| v.to_str().unwrap().to_string());
    let expected = format!("Bearer {}", API_KEY);
    assert_eq!(auth.as_deref(), Some(expected.as_str()));
}
