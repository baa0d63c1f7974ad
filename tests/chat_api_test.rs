//! Mock API tests for the chat client.

use serde_json::json;
use sorachat::prelude::*;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chat_completion_response(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1677652288,
        "model": "gpt-5-pro",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

fn client_for(server: &MockServer) -> ChatClient {
    ChatClient::builder()
        .base_url(format!("{}/v1", server.uri()))
        .build()
        .unwrap()
}

fn credential() -> Credential {
    Credential::new("sk-test").unwrap()
}

#[tokio::test]
async fn test_chat_posts_text_prompt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({
            "model": "gpt-5-pro",
            "max_tokens": 2000,
            "messages": [
                {"role": "system"},
                {"role": "user", "content": "Hello"}
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chat_completion_response("Hi there!")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .send(&ChatRequest::new("Hello"), &credential())
        .await
        .unwrap();

    assert_eq!(reply.text, "Hi there!");
    assert_eq!(reply.model.as_deref(), Some("gpt-5-pro"));
}

#[tokio::test]
async fn test_chat_image_part_follows_text_part() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_completion_response("I see a red square image.")),
        )
        .mount(&server)
        .await;

    let request = ChatRequest::new("What is in this image?")
        .with_image(InlineImage::from_bytes("image/png", b"\x89PNG\r\n\x1a\n"));
    let reply = client_for(&server)
        .send(&request, &credential())
        .await
        .unwrap();
    assert!(reply.text.contains("image"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method.as_str(), "POST");

    let body: serde_json::Value = requests[0].body_json().unwrap();
    let content = body["messages"][1]["content"].as_array().unwrap();
    assert_eq!(content[0]["type"], "text");
    assert_eq!(content[0]["text"], "What is in this image?");
    assert_eq!(content[1]["type"], "image_url");
    assert!(content[1]["image_url"]["url"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn test_chat_rejected_key_is_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Invalid API key",
                "type": "invalid_request_error",
                "code": "invalid_api_key"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .send(&ChatRequest::new("Hello"), &credential())
        .await
        .unwrap_err();

    match err {
        SoraChatError::Auth(message) => assert_eq!(message, "Invalid API key"),
        other => panic!("expected Auth, got {other:?}"),
    }
}

#[tokio::test]
async fn test_chat_api_error_without_message_uses_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .send(&ChatRequest::new("Hello"), &credential())
        .await
        .unwrap_err();

    match err {
        SoraChatError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "API request failed");
        }
        other => panic!("expected Api, got {other:?}"),
    }
}

#[tokio::test]
async fn test_chat_missing_content_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .send(&ChatRequest::new("Hello"), &credential())
        .await
        .unwrap_err();

    assert!(matches!(err, SoraChatError::MalformedResponse(_)));
}
