//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for shortlink-relay using clap's derive macros.

use clap::{Parser, Subcommand};

/// shortlink-relay - a credential-hiding proxy in front of a link-shortening provider
#[derive(Parser, Debug)]
#[command(name = "shortlink-relay")]
#[command(version)]
#[command(about = "Shorten URLs through a relay that keeps the provider API key server-side", long_about = None)]
pub struct Cli {
    /// Path to a TOML config file (default: config.toml if present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the HTTP relay (default when no command is given)
    Serve,

    /// Shorten a URL through a running relay
    ///
    /// Usage: shorten <URL> [--slug SLUG]
    Shorten {
        /// Long URL; `https://` is assumed when no scheme is given
        url: String,

        /// Custom back-half (3-50 chars of A-Z a-z 0-9 _ -)
        #[arg(long, short = 's')]
        slug: Option<String>,

        /// Print the short link without touching the clipboard
        #[arg(long)]
        no_copy: bool,
    },

    /// Show or edit the local history of shortened links
    History {
        #[command(subcommand)]
        action: Option<HistoryCommands>,
    },

    /// Check whether the relay's provider credential works
    Status,

    /// Show account usage reported by the provider
    Stats,

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum HistoryCommands {
    /// List remembered links, newest first (default)
    List,

    /// Forget one entry
    Remove {
        /// Entry id as shown by `history list`
        id: String,
    },

    /// Forget everything
    Clear,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ConfigCommands {
    /// Write a sample config file
    Generate {
        /// Output path (default: config.example.toml)
        path: Option<String>,

        /// Overwrite without asking
        #[arg(long)]
        force: bool,
    },
}
