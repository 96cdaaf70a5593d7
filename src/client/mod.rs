//! Terminal client for the relay
//!
//! Talks to a running relay over HTTP and keeps the local history.
//!
//! # Architecture
//!
//! ```text
//! CLI → ShortenView ──→ ShortenBackend (RelayClient → HTTP relay)
//!                   └→ HistoryStore (FileStore, degrades to memory)
//! ```

mod clipboard;
mod relay_client;
mod view;

pub use clipboard::{CopyOutcome, copy_to_clipboard};
pub use relay_client::RelayClient;
pub use view::{CredentialStatus, ShortenView, SubmitBlocked, ViewState, error_hint};

use std::fmt;

use async_trait::async_trait;

use crate::error_code::ApiErrorCode;
use crate::services::{AccountStats, AccountSummary, ShortenResult};

// ============ ClientError ============

/// Errors from the client layer
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// The relay answered with an error body
    Api {
        status: u16,
        code: Option<ApiErrorCode>,
        message: String,
    },
    /// The relay could not be reached or answered garbage
    Transport(String),
}

impl ClientError {
    pub fn code(&self) -> Option<ApiErrorCode> {
        match self {
            ClientError::Api { code, .. } => *code,
            ClientError::Transport(_) => None,
        }
    }

    /// Text shown to the user verbatim
    pub fn message(&self) -> &str {
        match self {
            ClientError::Api { message, .. } => message,
            ClientError::Transport(message) => message,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Api {
                status,
                code: Some(code),
                message,
            } => write!(f, "{} ({} {})", message, status, code),
            ClientError::Api {
                status, message, ..
            } => write!(f, "{} ({})", message, status),
            ClientError::Transport(message) => write!(f, "Relay unreachable: {}", message),
        }
    }
}

impl std::error::Error for ClientError {}

/// What the view needs from the relay
#[async_trait]
pub trait ShortenBackend: Send + Sync {
    async fn shorten(
        &self,
        url: &str,
        custom_slug: Option<&str>,
    ) -> Result<ShortenResult, ClientError>;

    async fn test_credential(&self) -> Result<AccountSummary, ClientError>;

    async fn stats(&self) -> Result<AccountStats, ClientError>;
}
