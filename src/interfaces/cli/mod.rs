//! CLI interface module
//!
//! Client-side commands: each talks to a running relay and/or the local
//! history store.

pub mod commands;

use std::fmt;
use std::sync::Arc;

use crate::cli::{Commands, ConfigCommands, HistoryCommands};
use crate::client::{ClientError, RelayClient, ShortenView};
use crate::config::StaticConfig;
use crate::history::{FileStore, HistoryStore};
use commands::{account_stats, config_generate, credential_status, history, shorten};

#[derive(Debug)]
pub enum CliError {
    /// The relay rejected the request or could not be reached
    RelayError(String),
    /// Local file or config problem
    LocalError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::RelayError(msg) => format!("Relay error: {}", msg),
            CliError::LocalError(msg) => format!("Local error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::RelayError(msg) => format!("{} {}", "Relay error:".red().bold(), msg.white()),
            CliError::LocalError(msg) => {
                format!("{} {}", "Local error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        CliError::RelayError(err.to_string())
    }
}

impl From<crate::errors::RelayError> for CliError {
    fn from(err: crate::errors::RelayError) -> Self {
        CliError::LocalError(err.to_string())
    }
}

/// Open the history store in the configured data directory
pub fn open_history(config: &StaticConfig) -> HistoryStore {
    let dir = config.client.resolved_history_dir();
    tracing::debug!("History directory: {}", dir.display());
    HistoryStore::load(Arc::new(FileStore::new(dir)))
}

/// Run a client command. `Serve` is dispatched by the caller.
pub async fn run_cli_command(cmd: Commands, config: Arc<StaticConfig>) -> Result<(), CliError> {
    match cmd {
        Commands::Serve => Err(CliError::CommandError(
            "serve is not a client command".to_string(),
        )),
        Commands::Shorten { url, slug, no_copy } => {
            let mut view = ShortenView::new(RelayClient::new(&config.client), open_history(&config));
            shorten(&mut view, &url, slug.as_deref(), !no_copy).await
        }
        Commands::History { action } => {
            let mut store = open_history(&config);
            history(&mut store, action.unwrap_or(HistoryCommands::List))
        }
        Commands::Status => credential_status(&RelayClient::new(&config.client)).await,
        Commands::Stats => account_stats(&RelayClient::new(&config.client)).await,
        Commands::Config {
            action: ConfigCommands::Generate { path, force },
        } => config_generate(path, force),
    }
}
