//! # supportchat-core
//!
//! Headless conversation state for the support widget: transcript, session
//! identity, request lifecycle and local persistence.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use supportchat_core::{ControllerEvents, ControllerOptions, ConversationController};
//! use supportchat_storage::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let events = ControllerEvents::default()
//!         .with_on_error(|err| eprintln!("support chat failed: {}", err));
//!     let controller = ConversationController::from_options(
//!         ControllerOptions::new("pk_test_123"),
//!         Arc::new(MemoryStore::new()),
//!         events,
//!     );
//!
//!     controller.send_message("Do you ship to Canada?").await;
//!     for message in controller.messages() {
//!         println!("{}: {}", message.role, message.content);
//!     }
//! }
//! ```

pub mod controller;
pub mod events;
pub mod history;
pub mod widget;

pub use controller::{Activity, ControllerOptions, ConversationController, ConversationState};
pub use events::ControllerEvents;
pub use widget::SupportWidget;

pub use supportchat_api::{RequestError, RequestErrorKind};
pub use supportchat_types::{Message, Role, Source};
