use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use tracing::{error, warn};

use shortlink_relay::cli::{Cli, Commands};
use shortlink_relay::config::{StaticConfig, validate_config};
use shortlink_relay::runtime::modes::{run_client, run_server};
use shortlink_relay::system::logging::{client_logging_config, init_logging};
use shortlink_relay::system::panic_handler::{RunMode, install_panic_hook};

async fn serve(config: Arc<StaticConfig>) -> ExitCode {
    let report = validate_config(&config);
    if !report.is_ok() {
        for e in &report.errors {
            eprintln!("{} {}", "Config error:".red(), e);
        }
        return ExitCode::FAILURE;
    }

    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return ExitCode::FAILURE;
        }
    };
    install_panic_hook(RunMode::Server, config.server.environment);

    for w in &report.warnings {
        warn!("Config: {}", w);
    }

    match run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server exited with error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn client(command: Commands, config: Arc<StaticConfig>) -> ExitCode {
    let _guard = init_logging(&client_logging_config(&config.logging)).ok();
    install_panic_hook(RunMode::Client, config.server.environment);

    match run_client(command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            ExitCode::FAILURE
        }
    }
}

#[actix_web::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match StaticConfig::load(cli.config.as_deref()) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        None | Some(Commands::Serve) => serve(config).await,
        Some(command) => client(command, config).await,
    }
}
