use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use supportchat_core::{ControllerEvents, SupportWidget};
use supportchat_storage::{FileStore, KeyValueStore, MemoryStore};

mod app;
mod cli;
mod config;

use cli::Cli;
use config::StorageChoice;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = config::load(&cli)?;
    let store: Arc<dyn KeyValueStore> = match &config.storage {
        StorageChoice::Memory => Arc::new(MemoryStore::new()),
        StorageChoice::Directory(dir) => {
            log::debug!("Persisting conversation under {}", dir.display());
            Arc::new(FileStore::new(dir))
        }
    };

    let events = ControllerEvents::default()
        .with_on_error(|err| log::warn!("Support request failed ({:?}): {}", err.kind(), err))
        .with_on_message_received(|answer| log::debug!("Received answer ({} chars)", answer.chars().count()));

    let mut widget = SupportWidget::new(config.widget, store, events);

    if let Some(question) = &cli.ask {
        return app::ask_once(&widget, question).await;
    }

    app::run_repl_mode(&mut widget).await
}
