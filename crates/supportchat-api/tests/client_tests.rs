mod fixtures;

use fixtures::{unreachable_base_url, ChatMockServer, TEST_API_KEY};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use supportchat_api::error::{HISTORY_FAILED_MESSAGE, NO_RESPONSE_MESSAGE, UNKNOWN_ERROR_MESSAGE};
use supportchat_api::{ChatApiClient, ChatBackend, RequestError, RequestErrorKind};

fn client_for(server: &ChatMockServer) -> ChatApiClient {
    ChatApiClient::new(TEST_API_KEY, Some(server.base_url()))
}

#[tokio::test]
async fn test_send_message_success() {
    let server = ChatMockServer::new().await;
    server.mock_chat_success("Hi there", "session_abc").await;

    let answer = client_for(&server).send_message("Hello", None).await.unwrap();

    assert_eq!(answer.answer, "Hi there");
    assert_eq!(answer.session_id, "session_abc");
    assert!(answer.sources.is_empty());

    // No session yet, so the field is left out entirely
    assert_eq!(server.received_bodies().await, vec![json!({"question": "Hello"})]);
}

#[tokio::test]
async fn test_send_message_carries_session_and_sources() {
    let server = ChatMockServer::new().await;
    server.mock_chat_with_source("Within 5 days.", "session_1").await;

    let answer = client_for(&server)
        .send_message("When do refunds arrive?", Some("session_1"))
        .await
        .unwrap();

    assert_eq!(answer.sources.len(), 1);
    assert_eq!(answer.sources[0].title, "Refund policy");
    assert_eq!(answer.sources[0].match_percent(), 87);
    assert_eq!(
        server.received_bodies().await,
        vec![json!({"question": "When do refunds arrive?", "session_id": "session_1"})]
    );
}

#[tokio::test]
async fn test_application_failure_in_success_response() {
    let server = ChatMockServer::new().await;
    server
        .mock_chat_response(200, ChatMockServer::error_envelope("rate limited", 429))
        .await;

    let err = client_for(&server).send_message("Hello", None).await.unwrap_err();

    assert_eq!(err.kind(), RequestErrorKind::Application);
    assert_eq!(err.to_string(), "rate limited");
}

#[tokio::test]
async fn test_http_error_with_field_errors() {
    let server = ChatMockServer::new().await;
    server
        .mock_chat_response(
            400,
            json!({
                "response": {"status": "error", "message": "Validation failed", "code": 400},
                "data": null,
                "errors": {"question": ["Ensure this field has no more than 1000 characters."]}
            }),
        )
        .await;

    let err = client_for(&server).send_message("Hello", None).await.unwrap_err();

    match err {
        RequestError::Application { message, code, field_errors } => {
            assert_eq!(message, "Validation failed");
            assert_eq!(code, Some(400));
            assert_eq!(field_errors["question"].len(), 1);
        }
        other => panic!("expected application error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_error_without_envelope() {
    let server = ChatMockServer::new().await;
    server.mock_chat_raw(500, "Internal Server Error").await;

    let err = client_for(&server).send_message("Hello", None).await.unwrap_err();

    assert_eq!(err.kind(), RequestErrorKind::Application);
    assert_eq!(err.message(), UNKNOWN_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_malformed_success_body_is_unknown() {
    let server = ChatMockServer::new().await;
    server.mock_chat_raw(200, "not json").await;

    let err = client_for(&server).send_message("Hello", None).await.unwrap_err();

    assert_eq!(err.kind(), RequestErrorKind::Unknown);
    assert!(!err.message().is_empty());
}

#[tokio::test]
async fn test_unreachable_server_reports_no_response() {
    let client = ChatApiClient::new(TEST_API_KEY, Some(unreachable_base_url()));

    let err = client.send_message("Hello", None).await.unwrap_err();

    assert_eq!(err.kind(), RequestErrorKind::NoResponse);
    assert_eq!(err.message(), NO_RESPONSE_MESSAGE);
}

#[tokio::test]
async fn test_timeout_reports_no_response() {
    let server = ChatMockServer::new().await;
    server.mock_chat_delayed(Duration::from_secs(3)).await;

    let client = client_for(&server).with_timeout(Duration::from_millis(200));
    let err = client.send_message("Hello", None).await.unwrap_err();

    assert_eq!(err.kind(), RequestErrorKind::NoResponse);
}

#[tokio::test]
async fn test_get_conversation_history() {
    let server = ChatMockServer::new().await;
    server
        .mock_history(
            "s1",
            json!([
                {"role": "USER", "content": "hi", "created_at": "2024-01-01T00:00:00Z"},
                {"role": "ASSISTANT", "content": "hello!", "created_at": "2024-01-01T00:00:02Z"}
            ]),
        )
        .await;

    let history = client_for(&server).get_conversation_history("s1").await.unwrap();

    assert_eq!(history.session_id, "s1");
    assert_eq!(history.messages.len(), 2);
    assert_eq!(history.messages[0].content, "hi");
    assert_eq!(history.messages[1].role, "ASSISTANT");
}

#[tokio::test]
async fn test_history_failure_messages() {
    let server = ChatMockServer::new().await;
    server
        .mock_history_response("gone", 404, ChatMockServer::error_envelope("Session not found", 404))
        .await;
    server
        .mock_history_response(
            "empty",
            200,
            json!({"response": {"status": "success", "message": "OK", "code": 200}, "data": null}),
        )
        .await;

    let client = client_for(&server);

    let err = client.get_conversation_history("gone").await.unwrap_err();
    assert_eq!(err.kind(), RequestErrorKind::Application);
    assert_eq!(err.message(), "Session not found");

    let err = client.get_conversation_history("empty").await.unwrap_err();
    assert_eq!(err.kind(), RequestErrorKind::Unknown);
    assert_eq!(err.message(), HISTORY_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_updates_apply_to_later_requests() {
    let server = ChatMockServer::new().await;
    server.mock_chat_success("Hi there", "session_abc").await;

    let client = ChatApiClient::new("stale-key", Some(unreachable_base_url()));
    assert_eq!(
        client.send_message("Hello", None).await.unwrap_err().kind(),
        RequestErrorKind::NoResponse
    );

    client.update_base_url(server.base_url());
    client.update_api_key(TEST_API_KEY);

    let answer = client.send_message("Hello", None).await.unwrap();
    assert_eq!(answer.answer, "Hi there");
    assert_eq!(server.received_api_keys().await, vec![TEST_API_KEY.to_string()]);
}
