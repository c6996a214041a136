use std::collections::BTreeMap;

use thiserror::Error;

/// Used when the request was sent but nothing came back
pub const NO_RESPONSE_MESSAGE: &str = "No response from server. Please check your connection.";

/// Used when the backend rejected a request without explaining why
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

pub const SEND_FAILED_MESSAGE: &str = "Failed to send message";

pub const HISTORY_FAILED_MESSAGE: &str = "Failed to load conversation history";

pub const CLIENT_NOT_INITIALIZED_MESSAGE: &str = "API client not initialized";

/// Every failure a chat operation can report. `Display` is the human-readable message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    /// The backend answered with a non-success status
    #[error("{message}")]
    Application {
        message: String,
        code: Option<i64>,
        field_errors: BTreeMap<String, Vec<String>>,
    },
    /// The request never got an answer (connectivity failure or timeout)
    #[error("{message}")]
    NoResponse { message: String },
    /// Any other transport or decoding failure
    #[error("{message}")]
    Unknown { message: String },
    /// Rejected locally before any network traffic
    #[error("{message}")]
    Precondition { message: String },
}

/// Discriminant of [`RequestError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestErrorKind {
    Application,
    NoResponse,
    Unknown,
    Precondition,
}

impl RequestError {
    pub fn application(message: impl Into<String>, code: Option<i64>) -> Self {
        let message = message.into();
        RequestError::Application {
            message: if message.trim().is_empty() { UNKNOWN_ERROR_MESSAGE.to_string() } else { message },
            code,
            field_errors: BTreeMap::new(),
        }
    }

    pub fn no_response() -> Self {
        RequestError::NoResponse {
            message: NO_RESPONSE_MESSAGE.to_string(),
        }
    }

    /// Falls back to `fallback` when the underlying failure carries no text
    pub fn unknown(message: impl Into<String>, fallback: &str) -> Self {
        let message = message.into();
        RequestError::Unknown {
            message: if message.trim().is_empty() { fallback.to_string() } else { message },
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        RequestError::Precondition { message: message.into() }
    }

    pub fn not_initialized() -> Self {
        Self::precondition(CLIENT_NOT_INITIALIZED_MESSAGE)
    }

    pub fn with_field_errors(mut self, errors: BTreeMap<String, Vec<String>>) -> Self {
        if let RequestError::Application { field_errors, .. } = &mut self {
            *field_errors = errors;
        }
        self
    }

    pub fn kind(&self) -> RequestErrorKind {
        match self {
            RequestError::Application { .. } => RequestErrorKind::Application,
            RequestError::NoResponse { .. } => RequestErrorKind::NoResponse,
            RequestError::Unknown { .. } => RequestErrorKind::Unknown,
            RequestError::Precondition { .. } => RequestErrorKind::Precondition,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            RequestError::Application { message, .. }
            | RequestError::NoResponse { message }
            | RequestError::Unknown { message }
            | RequestError::Precondition { message } => message,
        }
    }

    /// Classify a reqwest failure
    pub(crate) fn from_transport(err: reqwest::Error, fallback: &str) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            log::debug!("Request got no response: {}", err);
            Self::no_response()
        } else {
            Self::unknown(err.to_string(), fallback)
        }
    }
}
