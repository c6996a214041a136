//! # supportchat-api
//!
//! Client for the customer-support chat backend.
//!
//! Every endpoint answers with a `{response, data}` envelope; this crate
//! unwraps it and folds transport and application failures into a single
//! [`RequestError`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use supportchat_api::{ChatApiClient, ChatBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), supportchat_api::RequestError> {
//!     let client = ChatApiClient::new("pk_test_123", Some("https://support.example.com/api".to_string()));
//!
//!     let answer = client.send_message("How do I reset my password?", None).await?;
//!     println!("{} (session {})", answer.answer, answer.session_id);
//!
//!     let history = client.get_conversation_history(&answer.session_id).await?;
//!     println!("{} messages so far", history.messages.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod request_log;

pub use client::{ChatApiClient, ChatBackend, DEFAULT_TIMEOUT};
pub use error::{RequestError, RequestErrorKind};
