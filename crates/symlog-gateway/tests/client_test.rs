//! Tests for the chat-completion client against a mock endpoint.

use std::time::Duration;

use serde_json::json;
use symlog_gateway::{ChatCompletionClient, Completion, CompletionRequest, GatewayConfig, GatewayError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ChatCompletionClient {
    ChatCompletionClient::new(GatewayConfig {
        endpoint: format!("{}/v1/chat/completions", server.uri()),
        api_key: "test-key".to_string(),
        model: "test-model".to_string(),
    })
    .expect("Failed to build client")
}

fn request(timeout: Duration) -> CompletionRequest {
    CompletionRequest {
        system: "be careful".to_string(),
        prompt: "I have a mild headache".to_string(),
        max_tokens: 400,
        temperature: 0.2,
        timeout,
    }
}

#[tokio::test]
async fn test_sends_chat_request_with_bearer_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "max_tokens": 400,
            "messages": [
                { "role": "system", "content": "be careful" },
                { "role": "user", "content": "I have a mild headache" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "Drink water." } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .complete(request(Duration::from_secs(5)))
        .await
        .unwrap();
    assert_eq!(reply, "Drink water.");
}

#[tokio::test]
async fn test_missing_reply_fields_yield_empty_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "x" })))
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .complete(request(Duration::from_secs(5)))
        .await
        .unwrap();
    assert_eq!(reply, "");
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete(request(Duration::from_secs(5)))
        .await
        .unwrap_err();
    match err {
        GatewayError::Status { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "rate limited");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_json_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete(request(Duration::from_secs(5)))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(2))
                .set_body_json(json!({ "message": "too late" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete(request(Duration::from_millis(100)))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Timeout { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    let client = ChatCompletionClient::new(GatewayConfig {
        endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
        api_key: "test-key".to_string(),
        model: "test-model".to_string(),
    })
    .unwrap();

    let err = client
        .complete(request(Duration::from_secs(5)))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)), "got {err:?}");
}
