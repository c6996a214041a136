//! Core types and structures for supportchat
//!
//! This crate provides the foundational types shared by the storage, API
//! client and conversation controller crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub mod config;

pub use config::{Position, ThemeConfig, WidgetConfig};

// ============================================================================
// Constants
// ============================================================================

/// Storage key holding the current session token
pub const SESSION_STORAGE_KEY: &str = "customer_support_session_id";

/// Storage key holding the serialized transcript
pub const MESSAGES_STORAGE_KEY: &str = "customer_support_messages";

/// Default backend location (local development server)
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Greeting shown when the transcript is empty
pub const DEFAULT_WELCOME_MESSAGE: &str = "Hi there! How can we help you today?";

/// Input placeholder used when none is configured
pub const DEFAULT_PLACEHOLDER: &str = "Type your message...";

// ============================================================================
// Message Types
// ============================================================================

/// Author of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Assistant => "ASSISTANT",
        }
    }

    /// Lower-case form used when deriving message ids
    pub fn as_lower(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role string is neither user nor assistant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown message role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "ASSISTANT" => Ok(Role::Assistant),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A knowledge-base document cited by an assistant answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    pub title: String,
    /// Relevance score in [0, 1]
    pub similarity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

impl Source {
    /// Similarity as a whole percentage, e.g. `87` for a score of 0.868
    pub fn match_percent(&self) -> u8 {
        (self.similarity * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// A single transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
}

impl Message {
    /// Message typed by the visitor
    pub fn user(content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: format!("user_{}", now.timestamp_millis()),
            role: Role::User,
            content: content.into(),
            timestamp: now,
            sources: None,
        }
    }

    /// Answer produced by the backend
    pub fn assistant(content: impl Into<String>, sources: Vec<Source>) -> Self {
        let now = Utc::now();
        Self {
            id: format!("assistant_{}", now.timestamp_millis()),
            role: Role::Assistant,
            content: content.into(),
            timestamp: now,
            sources: Some(sources),
        }
    }

    /// Locally fabricated assistant entry that surfaces a failure in the transcript
    pub fn error(content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: format!("error_{}", now.timestamp_millis()),
            role: Role::Assistant,
            content: content.into(),
            timestamp: now,
            sources: None,
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

// ============================================================================
// Wire Types
// ============================================================================

/// Status block carried by every backend response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: i64,
}

impl ResponseMeta {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// The `{response, data}` wrapper used by all endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub response: ResponseMeta,
    pub data: Option<T>,
    /// Per-field validation messages, present on some error responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Body of `POST /chat/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Payload of a successful chat exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatAnswer {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    pub session_id: String,
}

/// One entry of the server-side transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: String,
    pub content: String,
    pub created_at: String,
}

/// Payload of `GET /chat/history/<session>/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationHistory {
    pub session_id: String,
    #[serde(default)]
    pub messages: Vec<HistoryMessage>,
}
