use std::sync::Arc;

use supportchat_storage::KeyValueStore;
use supportchat_types::{Position, ThemeConfig, WidgetConfig};

use crate::controller::{ControllerOptions, ConversationController};
use crate::events::ControllerEvents;

/// Headless state of the toggleable support panel
pub struct SupportWidget {
    controller: Arc<ConversationController>,
    config: WidgetConfig,
    open: bool,
}

impl SupportWidget {
    pub fn new(config: WidgetConfig, store: Arc<dyn KeyValueStore>, events: ControllerEvents) -> Self {
        let options = ControllerOptions {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        };
        let controller = Arc::new(ConversationController::from_options(options, store, events));
        Self::with_controller(config, controller)
    }

    pub fn with_controller(config: WidgetConfig, controller: Arc<ConversationController>) -> Self {
        Self {
            controller,
            config,
            open: false,
        }
    }

    pub fn controller(&self) -> &Arc<ConversationController> {
        &self.controller
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open or close the panel, dismissing any pending error; returns the new state
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        if self.controller.error().is_some() {
            self.controller.clear_error();
        }
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Assistant replies counter shown on the closed launcher
    pub fn badge_count(&self) -> Option<usize> {
        if self.open {
            return None;
        }
        let messages = self.controller.messages();
        if messages.is_empty() {
            return None;
        }
        Some(messages.iter().filter(|m| m.is_assistant()).count())
    }

    /// The greeting replaces the transcript while nothing has been said yet
    pub fn show_welcome(&self) -> bool {
        self.open && !self.controller.is_loading() && self.controller.messages().is_empty()
    }

    pub fn welcome_message(&self) -> &str {
        self.config.welcome_message()
    }

    pub fn placeholder(&self) -> &str {
        self.config.placeholder()
    }

    pub fn position(&self) -> Position {
        self.config.position
    }

    pub fn theme(&self) -> Option<&ThemeConfig> {
        self.config.theme.as_ref()
    }
}
