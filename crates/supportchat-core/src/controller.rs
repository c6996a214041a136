use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use supportchat_api::{ChatApiClient, ChatBackend, RequestError};
use supportchat_storage::{generate_session_id, KeyValueStore, PersistentCell};
use supportchat_types::{Message, MESSAGES_STORAGE_KEY, SESSION_STORAGE_KEY};

use crate::events::ControllerEvents;
use crate::history::history_to_messages;

/// Credentials used to build the HTTP backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerOptions {
    pub api_key: String,
    pub base_url: Option<String>,
}

impl ControllerOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// What the controller is currently waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Idle,
    Sending,
    LoadingHistory,
}

/// Point-in-time copy of the conversation
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationState {
    pub messages: Vec<Message>,
    pub session_id: String,
    pub is_loading: bool,
    pub error: Option<RequestError>,
}

struct Inner {
    messages: PersistentCell<Vec<Message>>,
    session_id: PersistentCell<String>,
    error: Option<RequestError>,
    activity: Activity,
    in_flight: usize,
}

impl Inner {
    fn begin(&mut self, activity: Activity) {
        self.in_flight += 1;
        self.activity = activity;
        self.error = None;
    }

    fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.activity = Activity::Idle;
        }
    }

    /// Append, suffixing the id if one minted in the same millisecond already exists
    fn append(&mut self, mut message: Message) {
        let base_id = message.id.clone();
        let mut n = 1;
        while self.messages.get().iter().any(|m| m.id == message.id) {
            message.id = format!("{}_{}", base_id, n);
            n += 1;
        }
        self.messages.modify(|messages| messages.push(message));
    }
}

/// Owns one conversation: transcript, session token and request lifecycle.
///
/// All methods take `&self`. State is only touched between awaits, so
/// overlapping sends compose by appending to whatever the transcript holds
/// when each one resumes.
pub struct ConversationController {
    inner: Mutex<Inner>,
    backend: RwLock<Option<Arc<dyn ChatBackend>>>,
    events: ControllerEvents,
    closed: AtomicBool,
}

impl ConversationController {
    /// Seed state from `store`; `backend = None` leaves the client uninitialized
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        backend: Option<Arc<dyn ChatBackend>>,
        events: ControllerEvents,
    ) -> Self {
        let messages = PersistentCell::new(store.clone(), MESSAGES_STORAGE_KEY, Vec::new());
        let session_id = PersistentCell::new(store, SESSION_STORAGE_KEY, generate_session_id());

        Self {
            inner: Mutex::new(Inner {
                messages,
                session_id,
                error: None,
                activity: Activity::Idle,
                in_flight: 0,
            }),
            backend: RwLock::new(backend),
            events,
            closed: AtomicBool::new(false),
        }
    }

    /// Build the HTTP backend from credentials; an empty API key leaves it uninitialized
    pub fn from_options(
        options: ControllerOptions,
        store: Arc<dyn KeyValueStore>,
        events: ControllerEvents,
    ) -> Self {
        Self::new(store, build_backend(&options), events)
    }

    /// Swap in a client for new credentials; requests already running keep the old one
    pub fn configure(&self, options: &ControllerOptions) {
        let backend = build_backend(options);
        *self.backend.write().unwrap_or_else(PoisonError::into_inner) = backend;
    }

    pub fn set_backend(&self, backend: Option<Arc<dyn ChatBackend>>) {
        *self.backend.write().unwrap_or_else(PoisonError::into_inner) = backend;
    }

    pub fn is_initialized(&self) -> bool {
        self.backend().is_some()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.get().clone()
    }

    pub fn session_id(&self) -> String {
        self.lock().session_id.get().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().activity != Activity::Idle
    }

    pub fn activity(&self) -> Activity {
        self.lock().activity
    }

    pub fn error(&self) -> Option<RequestError> {
        self.lock().error.clone()
    }

    pub fn snapshot(&self) -> ConversationState {
        let inner = self.lock();
        ConversationState {
            messages: inner.messages.get().clone(),
            session_id: inner.session_id.get().clone(),
            is_loading: inner.activity != Activity::Idle,
            error: inner.error.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Send a question and append the answer, or a visible error entry, to the transcript
    pub async fn send_message(&self, question: &str) {
        let Some(backend) = self.backend() else {
            self.record_error(RequestError::not_initialized());
            return;
        };

        if question.trim().is_empty() {
            return;
        }

        let session_id = {
            let mut inner = self.lock();
            inner.append(Message::user(question));
            inner.begin(Activity::Sending);
            inner.session_id.get().clone()
        };
        self.events.message_sent(question);

        let session = Some(session_id.as_str()).filter(|s| !s.is_empty());
        let result = backend.send_message(question, session).await;

        if self.is_closed() {
            log::debug!("Controller shut down, dropping reply to \"{}\"", question);
            self.lock().finish();
            return;
        }

        match result {
            Ok(reply) => {
                {
                    let mut inner = self.lock();
                    inner.append(Message::assistant(reply.answer.clone(), reply.sources));
                    // Only a token different from the one sent counts as a migration
                    if reply.session_id != session_id {
                        log::info!("Session changed by server: {} -> {}", session_id, reply.session_id);
                        inner.session_id.set(reply.session_id);
                    }
                    inner.finish();
                }
                self.events.message_received(&reply.answer);
            }
            Err(err) => {
                {
                    let mut inner = self.lock();
                    inner.error = Some(err.clone());
                    inner.append(Message::error(format!("Sorry, I encountered an error: {}", err)));
                    inner.finish();
                }
                self.events.error(&err);
            }
        }
    }

    /// Replace the transcript with the server's copy of the current session
    pub async fn load_history(&self) {
        let Some(backend) = self.backend() else {
            return;
        };

        let session_id = {
            let mut inner = self.lock();
            let session_id = inner.session_id.get().clone();
            if session_id.is_empty() {
                return;
            }
            inner.begin(Activity::LoadingHistory);
            session_id
        };

        let result = backend.get_conversation_history(&session_id).await;

        if self.is_closed() {
            log::debug!("Controller shut down, dropping history for {}", session_id);
            self.lock().finish();
            return;
        }

        match result {
            Ok(history) => {
                let mut inner = self.lock();
                inner.messages.set(history_to_messages(&history.messages));
                inner.finish();
            }
            Err(err) => {
                {
                    let mut inner = self.lock();
                    inner.error = Some(err.clone());
                    inner.finish();
                }
                self.events.error(&err);
            }
        }
    }

    /// Empty the transcript and start a fresh session; purely local
    pub fn clear_history(&self) {
        let mut inner = self.lock();
        inner.messages.set(Vec::new());
        let session_id = generate_session_id();
        log::info!("Conversation cleared, new session {}", session_id);
        inner.session_id.set(session_id);
    }

    /// Remove the message with `id`; returns whether one was removed
    pub fn delete_message(&self, id: &str) -> bool {
        let mut inner = self.lock();
        if !inner.messages.get().iter().any(|m| m.id == id) {
            return false;
        }
        inner.messages.update(|messages| messages.iter().filter(|m| m.id != id).cloned().collect());
        true
    }

    pub fn clear_error(&self) {
        self.lock().error = None;
    }

    /// Replies that arrive after this are discarded
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn record_error(&self, err: RequestError) {
        self.lock().error = Some(err.clone());
        self.events.error(&err);
    }

    fn backend(&self) -> Option<Arc<dyn ChatBackend>> {
        self.backend.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn build_backend(options: &ControllerOptions) -> Option<Arc<dyn ChatBackend>> {
    if options.api_key.trim().is_empty() {
        log::warn!("No API key configured, support chat client left uninitialized");
        return None;
    }
    Some(Arc::new(ChatApiClient::new(options.api_key.clone(), options.base_url.clone())))
}
