use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use supportchat_types::WidgetConfig;

use crate::cli::Cli;

/// Where the conversation is persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageChoice {
    Memory,
    Directory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub widget: WidgetConfig,
    pub storage: StorageChoice,
}

/// Merge the optional config file with command-line flags
pub fn load(cli: &Cli) -> Result<AppConfig> {
    let file_config = match &cli.config {
        Some(path) => Some(read_widget_config(path)?),
        None => None,
    };
    resolve(cli, file_config)
}

pub fn resolve(cli: &Cli, file_config: Option<WidgetConfig>) -> Result<AppConfig> {
    let mut widget = file_config.unwrap_or_default();

    if let Some(api_key) = &cli.api_key {
        widget.api_key = api_key.clone();
    }
    if let Some(base_url) = &cli.base_url {
        widget.base_url = Some(base_url.clone());
    }

    if widget.api_key.trim().is_empty() {
        bail!("No API key configured: pass --api-key, set SUPPORTCHAT_API_KEY or add apiKey to the config file");
    }

    let storage = if cli.memory {
        StorageChoice::Memory
    } else {
        match &cli.data_dir {
            Some(dir) => StorageChoice::Directory(dir.clone()),
            None => StorageChoice::Directory(default_data_dir()?),
        }
    };

    Ok(AppConfig { widget, storage })
}

pub fn read_widget_config(path: &Path) -> Result<WidgetConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// `~/.supportchat`, created lazily by the store on first write
pub fn default_data_dir() -> Result<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Failed to get home directory")?;

    Ok(PathBuf::from(home_dir).join(".supportchat"))
}
