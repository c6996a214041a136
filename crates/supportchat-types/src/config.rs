//! Embedding configuration consumed by the widget layer.

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_BASE_URL, DEFAULT_PLACEHOLDER, DEFAULT_WELCOME_MESSAGE};

/// Screen corner the launcher is anchored to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::BottomRight => "bottom-right",
            Position::BottomLeft => "bottom-left",
            Position::TopRight => "top-right",
            Position::TopLeft => "top-left",
        }
    }
}

/// Visual overrides; unset fields fall back to the stylesheet defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub font_family: Option<String>,
    pub border_radius: Option<String>,
    pub button_color: Option<String>,
    pub user_message_color: Option<String>,
    pub assistant_message_color: Option<String>,
    pub success_color: Option<String>,
    pub error_color: Option<String>,
    pub border_color: Option<String>,
    pub shadow_color: Option<String>,
}

/// Everything an embedder supplies to mount the support widget
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    #[serde(default)]
    pub api_key: String,
    pub base_url: Option<String>,
    pub theme: Option<ThemeConfig>,
    #[serde(default)]
    pub position: Position,
    pub welcome_message: Option<String>,
    pub placeholder: Option<String>,
    pub class_name: Option<String>,
}

impl WidgetConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn welcome_message(&self) -> &str {
        self.welcome_message.as_deref().unwrap_or(DEFAULT_WELCOME_MESSAGE)
    }

    pub fn placeholder(&self) -> &str {
        self.placeholder.as_deref().unwrap_or(DEFAULT_PLACEHOLDER)
    }
}
