use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for supportchat
#[derive(Parser, Debug, Default)]
#[command(name = "supportchat")]
#[command(about = "Customer support chat in your terminal")]
#[command(version)]
pub struct Cli {
    /// API key sent as X-API-Key with every request
    #[arg(long, env = "SUPPORTCHAT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Backend base URL (e.g., https://support.example.com/api)
    #[arg(long, env = "SUPPORTCHAT_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// TOML widget configuration; command-line flags take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the persisted conversation (default: ~/.supportchat)
    #[arg(long, env = "SUPPORTCHAT_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Keep the conversation in memory only
    #[arg(long, conflicts_with = "data_dir")]
    pub memory: bool,

    /// Ask a single question, print the answer and exit
    #[arg(long, value_name = "TEXT")]
    pub ask: Option<String>,

    /// Log requests and responses
    #[arg(short, long)]
    pub verbose: bool,
}
