use std::fmt;
use std::sync::Arc;

use supportchat_api::RequestError;

pub type ErrorHandler = Arc<dyn Fn(&RequestError) + Send + Sync>;
pub type TextHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Optional lifecycle hooks. Handlers run synchronously on the task that
/// triggered them; a missing handler is simply skipped.
#[derive(Clone, Default)]
pub struct ControllerEvents {
    pub on_error: Option<ErrorHandler>,
    /// Receives the question right after it is added to the transcript
    pub on_message_sent: Option<TextHandler>,
    /// Receives the answer text of every successful exchange
    pub on_message_received: Option<TextHandler>,
}

impl ControllerEvents {
    pub fn with_on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&RequestError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(f));
        self
    }

    pub fn with_on_message_sent<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_message_sent = Some(Arc::new(f));
        self
    }

    pub fn with_on_message_received<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_message_received = Some(Arc::new(f));
        self
    }

    pub(crate) fn error(&self, err: &RequestError) {
        if let Some(handler) = &self.on_error {
            handler(err);
        }
    }

    pub(crate) fn message_sent(&self, question: &str) {
        if let Some(handler) = &self.on_message_sent {
            handler(question);
        }
    }

    pub(crate) fn message_received(&self, answer: &str) {
        if let Some(handler) = &self.on_message_received {
            handler(answer);
        }
    }
}

impl fmt::Debug for ControllerEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerEvents")
            .field("on_error", &self.on_error.is_some())
            .field("on_message_sent", &self.on_message_sent.is_some())
            .field("on_message_received", &self.on_message_received.is_some())
            .finish()
    }
}
