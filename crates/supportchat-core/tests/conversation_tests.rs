//! End-to-end conversation flows against a mock HTTP backend.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use supportchat_core::{
    ControllerEvents, ControllerOptions, ConversationController, RequestErrorKind, Role,
};
use supportchat_storage::{KeyValueStore, MemoryStore, PersistentCell};
use supportchat_types::{Message, MESSAGES_STORAGE_KEY, SESSION_STORAGE_KEY};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-api-key";

fn controller_for(server: &MockServer, store: Arc<dyn KeyValueStore>) -> ConversationController {
    let options = ControllerOptions::new(API_KEY).with_base_url(format!("{}/api", server.uri()));
    ConversationController::from_options(options, store, ControllerEvents::default())
}

async fn mock_chat(server: &MockServer, body: Value) {
    Mock::given(method("POST"))
        .and(path("/api/chat/"))
        .and(header("x-api-key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_hello_scenario_migrates_session() {
    let server = MockServer::start().await;
    mock_chat(
        &server,
        json!({
            "response": {"status": "success", "message": "OK", "code": 200},
            "data": {"answer": "Hi there", "sources": [], "session_id": "session_abc"}
        }),
    )
    .await;

    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let controller = controller_for(&server, store.clone());

    controller.send_message("Hello").await;

    let state = controller.snapshot();
    assert_eq!(state.messages.len(), 2);
    assert_eq!((state.messages[0].role, state.messages[0].content.as_str()), (Role::User, "Hello"));
    assert_eq!((state.messages[1].role, state.messages[1].content.as_str()), (Role::Assistant, "Hi there"));
    assert_eq!(state.session_id, "session_abc");
    assert!(state.error.is_none());

    assert_eq!(
        store.get(SESSION_STORAGE_KEY).unwrap().as_deref(),
        Some("\"session_abc\"")
    );
}

#[tokio::test]
async fn test_application_error_scenario() {
    let server = MockServer::start().await;
    mock_chat(
        &server,
        json!({"response": {"status": "error", "message": "rate limited", "code": 429}, "data": null}),
    )
    .await;

    let controller = controller_for(&server, Arc::new(MemoryStore::new()));
    controller.send_message("Hello").await;

    let state = controller.snapshot();
    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.messages[1].role, Role::Assistant);
    assert!(state.messages[1].content.contains("rate limited"));
    let error = state.error.unwrap();
    assert_eq!(error.kind(), RequestErrorKind::Application);
    assert!(error.to_string().contains("rate limited"));
}

#[tokio::test]
async fn test_unreachable_server_scenario() {
    let options = ControllerOptions::new(API_KEY).with_base_url("http://127.0.0.1:1/api");
    let controller =
        ConversationController::from_options(options, Arc::new(MemoryStore::new()), ControllerEvents::default());

    controller.send_message("Hello").await;

    let error = controller.error().unwrap();
    assert_eq!(error.kind(), RequestErrorKind::NoResponse);
    assert!(error.message().contains("No response from server"));
    assert!(controller.messages()[1].content.contains("No response from server"));
}

#[tokio::test]
async fn test_load_history_scenario() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chat/history/s1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"status": "success", "message": "OK", "code": 200},
            "data": {
                "session_id": "s1",
                "messages": [{"role": "USER", "content": "hi", "created_at": "2024-01-01T00:00:00Z"}]
            }
        })))
        .mount(&server)
        .await;

    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    store.set(SESSION_STORAGE_KEY, "\"s1\"").unwrap();
    let controller = controller_for(&server, store.clone());
    assert_eq!(controller.session_id(), "s1");

    controller.load_history().await;

    let messages = controller.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "hi");
    assert_eq!(messages[0].timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

    // The reloaded transcript is what gets persisted
    let persisted = PersistentCell::new(store, MESSAGES_STORAGE_KEY, Vec::<Message>::new());
    assert_eq!(persisted.get(), &messages);
}

#[tokio::test]
async fn test_existing_session_is_sent_and_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/"))
        .and(body_json(json!({"question": "Still there?", "session_id": "session_known"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"status": "success", "message": "OK", "code": 200},
            "data": {"answer": "Yes", "sources": [], "session_id": "session_known"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    store.set(SESSION_STORAGE_KEY, "\"session_known\"").unwrap();
    let controller = controller_for(&server, store);

    controller.send_message("Still there?").await;

    assert_eq!(controller.session_id(), "session_known");
    assert_eq!(controller.messages()[1].content, "Yes");
}
