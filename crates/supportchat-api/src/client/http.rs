use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use supportchat_types::{
    ApiEnvelope, ChatAnswer, ChatRequest, ConversationHistory, DEFAULT_BASE_URL,
};

use crate::client::ChatBackend;
use crate::error::{RequestError, HISTORY_FAILED_MESSAGE, SEND_FAILED_MESSAGE};
use crate::request_log;

/// Requests that take longer than this fail as "no response"
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
struct ClientSettings {
    api_key: String,
    base_url: String,
}

/// HTTP client for the support chat backend
pub struct ChatApiClient {
    settings: RwLock<ClientSettings>,
    timeout: Duration,
    client: reqwest::Client,
}

impl ChatApiClient {
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            settings: RwLock::new(ClientSettings {
                api_key: api_key.into(),
                base_url: normalize_base_url(base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)),
            }),
            timeout: DEFAULT_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn api_key(&self) -> String {
        self.settings().api_key
    }

    pub fn base_url(&self) -> String {
        self.settings().base_url
    }

    /// Applies to every request started after this call
    pub fn update_api_key(&self, api_key: impl Into<String>) {
        let mut settings = self.settings.write().unwrap_or_else(PoisonError::into_inner);
        settings.api_key = api_key.into();
    }

    /// Applies to every request started after this call
    pub fn update_base_url(&self, base_url: impl AsRef<str>) {
        let mut settings = self.settings.write().unwrap_or_else(PoisonError::into_inner);
        settings.base_url = normalize_base_url(base_url.as_ref());
    }

    fn settings(&self) -> ClientSettings {
        self.settings.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn endpoint(settings: &ClientSettings, path: &str) -> String {
        format!("{}{}", settings.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder, settings: &ClientSettings) -> RequestBuilder {
        builder
            .header("Content-Type", "application/json")
            .header("X-API-Key", &settings.api_key)
            .timeout(self.timeout)
    }

    /// Send a prepared request and unwrap the response envelope
    async fn execute<T: DeserializeOwned>(
        &self,
        url: &str,
        builder: RequestBuilder,
        fallback: &str,
    ) -> Result<T, RequestError> {
        let response = builder
            .send()
            .await
            .map_err(|e| RequestError::from_transport(e, fallback))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RequestError::from_transport(e, fallback))?;
        request_log::log_response(url, status, &body);

        if !status.is_success() {
            return Err(rejection_from_body(&body, i64::from(status.as_u16())));
        }

        let envelope: ApiEnvelope<T> =
            serde_json::from_str(&body).map_err(|e| RequestError::unknown(e.to_string(), fallback))?;

        if !envelope.response.is_success() {
            let code = Some(envelope.response.code);
            return Err(RequestError::application(envelope.response.message, code)
                .with_field_errors(envelope.errors.unwrap_or_default()));
        }

        envelope
            .data
            .ok_or_else(|| RequestError::unknown("", fallback))
    }
}

#[async_trait]
impl ChatBackend for ChatApiClient {
    async fn send_message(&self, question: &str, session_id: Option<&str>) -> Result<ChatAnswer, RequestError> {
        if question.trim().is_empty() {
            return Err(RequestError::precondition("Question must not be empty"));
        }

        let settings = self.settings();
        let url = Self::endpoint(&settings, "/chat/");
        let request = ChatRequest {
            question: question.to_string(),
            session_id: session_id.map(str::to_string),
        };
        request_log::log_request("POST", &url, &settings.api_key, Some(&request));

        let builder = self.authorize(self.client.post(&url), &settings).json(&request);
        self.execute(&url, builder, SEND_FAILED_MESSAGE).await
    }

    async fn get_conversation_history(&self, session_id: &str) -> Result<ConversationHistory, RequestError> {
        if session_id.trim().is_empty() {
            return Err(RequestError::precondition("Session id must not be empty"));
        }

        let settings = self.settings();
        let url = Self::endpoint(&settings, &format!("/chat/history/{}/", session_id));
        request_log::log_request::<()>("GET", &url, &settings.api_key, None);

        let builder = self.authorize(self.client.get(&url), &settings);
        self.execute(&url, builder, HISTORY_FAILED_MESSAGE).await
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Build the error for a non-2xx response, preferring the envelope's message
fn rejection_from_body(body: &str, http_status: i64) -> RequestError {
    match serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body) {
        Ok(envelope) => {
            let code = if envelope.response.code != 0 { envelope.response.code } else { http_status };
            RequestError::application(envelope.response.message, Some(code))
                .with_field_errors(envelope.errors.unwrap_or_default())
        }
        Err(_) => RequestError::application("", Some(http_status)),
    }
}
