use std::sync::Arc;

use anyhow::anyhow;
use axum_test::TestServer;
use healthchat::config::AppConfig;
use healthchat::llm::{CompletionClient, Message};
use healthchat::{AppState, server};
use serde_json::{Value, json};

/// Mock LLM: replies "Echo: <last message>", or fails on "fail".
struct EchoClient;

#[async_trait::async_trait]
impl CompletionClient for EchoClient {
    async fn complete(&self, _system: &str, messages: &[Message]) -> anyhow::Result<String> {
        let last = messages.last().map(|m| m.content.as_str()).unwrap_or_default();
        if last == "fail" {
            return Err(anyhow!("Mock LLM failure"));
        }
        Ok(format!("Echo: {last}"))
    }
}

fn test_server() -> TestServer {
    let config = AppConfig::load_from_args(["healthchat"]).expect("default config");
    let state = AppState::new(Arc::new(config), Arc::new(EchoClient));
    TestServer::new(server::router(state)).expect("test server")
}

#[tokio::test]
async fn test_chat_round_trip() {
    let server = test_server();

    let resp = server
        .post("/api/chat")
        .json(&json!({"message": "Hello", "session_id": "t1"}))
        .await;
    resp.assert_status_ok();
    resp.assert_json(&json!({"session_id": "t1", "reply": "Echo: Hello"}));

    let messages: Value = server.get("/api/sessions/t1/messages").await.json();
    assert_eq!(
        messages,
        json!([
            {"role": "user", "content": "Hello"},
            {"role": "assistant", "content": "Echo: Hello"}
        ])
    );
}

#[tokio::test]
async fn test_chat_assigns_session_id() {
    let server = test_server();

    let body: Value = server
        .post("/api/chat")
        .json(&json!({"message": "Book appointment"}))
        .await
        .json();

    let id = body["session_id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
    assert_eq!(body["reply"], "Echo: Book appointment");

    let sessions: Value = server.get("/api/sessions").await.json();
    assert_eq!(sessions, json!([{"id": id, "message_count": 2}]));
}

#[tokio::test]
async fn test_upstream_failure_maps_to_bad_gateway() {
    let server = test_server();

    server
        .post("/api/chat")
        .json(&json!({"message": "Hello", "session_id": "s"}))
        .await
        .assert_status_ok();

    let resp = server
        .post("/api/chat")
        .json(&json!({"message": "fail", "session_id": "s"}))
        .await;
    resp.assert_status(axum::http::StatusCode::BAD_GATEWAY);
    resp.assert_json(&json!({"error": "Mock LLM failure"}));

    let messages: Value = server.get("/api/sessions/s/messages").await.json();
    assert_eq!(messages.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_empty_message_is_bad_request() {
    let server = test_server();

    let resp = server
        .post("/api/chat")
        .json(&json!({"message": "", "session_id": "s"}))
        .await;
    resp.assert_status_bad_request();
}

#[tokio::test]
async fn test_malformed_body_is_json_bad_request() {
    let server = test_server();

    let resp = server
        .post("/api/chat")
        .json(&json!({"session_id": "s"}))
        .await;
    resp.assert_status_bad_request();
    let body: Value = resp.json();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid input"));

    assert!(server.get("/api/sessions").await.json::<Value>().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_session_messages_not_found() {
    let server = test_server();
    server
        .get("/api/sessions/nope/messages")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_index_renders_transcript() {
    let server = test_server();

    server
        .post("/api/chat")
        .json(&json!({"message": "What's my name?", "session_id": "page"}))
        .await
        .assert_status_ok();

    let html = server.get("/").add_query_param("session_id", "page").await.text();
    assert!(html.contains("Healthcare Chatbot"));
    assert!(html.contains("Echo: What's my name?"));

    let empty = server.get("/").await.text();
    assert!(!empty.contains("Echo:"));
}

#[tokio::test]
async fn test_health() {
    let server = test_server();
    server.get("/health").await.assert_text("ok");
}
