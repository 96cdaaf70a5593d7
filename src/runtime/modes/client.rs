//! Client mode
//!
//! Runs one terminal command against a running relay.

use std::sync::Arc;

use crate::cli::Commands;
use crate::config::StaticConfig;
use crate::interfaces::cli::{CliError, run_cli_command};

pub async fn run_client(command: Commands, config: Arc<StaticConfig>) -> Result<(), CliError> {
    tracing::debug!("Client mode, relay at {}", config.client.api_base);
    run_cli_command(command, config).await
}
