#![allow(dead_code)]

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-api-key";

/// Mock support backend speaking the `{response, data}` envelope
pub struct ChatMockServer {
    server: MockServer,
}

impl ChatMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL a client should be pointed at (includes the `/api` prefix)
    pub fn base_url(&self) -> String {
        format!("{}/api", self.server.uri())
    }

    pub async fn received_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|req| serde_json::from_slice(&req.body).ok())
            .collect()
    }

    pub async fn received_api_keys(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|req| req.headers.get("x-api-key"))
            .filter_map(|value| value.to_str().ok().map(str::to_string))
            .collect()
    }

    pub fn success_envelope(data: Value) -> Value {
        json!({
            "response": {"status": "success", "message": "OK", "code": 200},
            "data": data
        })
    }

    pub fn error_envelope(message: &str, code: i64) -> Value {
        json!({
            "response": {"status": "error", "message": message, "code": code},
            "data": null
        })
    }

    /// Successful answer to `POST /chat/`
    pub async fn mock_chat_success(&self, answer: &str, session_id: &str) {
        self.mock_chat_response(
            200,
            Self::success_envelope(json!({
                "answer": answer,
                "sources": [],
                "session_id": session_id
            })),
        )
        .await;
    }

    /// Successful answer that cites one knowledge-base source
    pub async fn mock_chat_with_source(&self, answer: &str, session_id: &str) {
        self.mock_chat_response(
            200,
            Self::success_envelope(json!({
                "answer": answer,
                "sources": [{
                    "url": "https://help.example.com/refunds",
                    "title": "Refund policy",
                    "similarity": 0.87,
                    "excerpt": "Refunds are issued within 5 business days."
                }],
                "session_id": session_id
            })),
        )
        .await;
    }

    pub async fn mock_chat_response(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/api/chat/"))
            .and(header("x-api-key", TEST_API_KEY))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer `POST /chat/` only after `delay`
    pub async fn mock_chat_delayed(&self, delay: Duration) {
        Mock::given(method("POST"))
            .and(path("/api/chat/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(Self::success_envelope(json!({
                        "answer": "late",
                        "sources": [],
                        "session_id": "session_late"
                    })))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mock_history(&self, session_id: &str, messages: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/api/chat/history/{}/", session_id)))
            .and(header("x-api-key", TEST_API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::success_envelope(json!({
                "session_id": session_id,
                "messages": messages
            }))))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_history_response(&self, session_id: &str, status: u16, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/api/chat/history/{}/", session_id)))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Respond with a body that is not an envelope at all
    pub async fn mock_chat_raw(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/api/chat/"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }
}

/// Address nothing listens on
pub fn unreachable_base_url() -> String {
    "http://127.0.0.1:1/api".to_string()
}
