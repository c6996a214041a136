use async_trait::async_trait;
use supportchat_types::{ChatAnswer, ConversationHistory};

use crate::error::RequestError;

pub mod http;

pub use http::{ChatApiClient, DEFAULT_TIMEOUT};

/// Chat backend seam - the conversation controller only talks to this trait
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Ask a question, continuing `session_id` when given
    async fn send_message(&self, question: &str, session_id: Option<&str>) -> Result<ChatAnswer, RequestError>;

    /// Fetch the server-side transcript of a session
    async fn get_conversation_history(&self, session_id: &str) -> Result<ConversationHistory, RequestError>;
}
