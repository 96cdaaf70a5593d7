//! Shortening view state machine
//!
//! `Idle → Submitting → {Success | Error} → Idle`. The credential badge is set
//! once on mount and gates submission.

use tracing::{debug, info, warn};

use super::{ClientError, ShortenBackend};
use crate::history::{HistoryEntry, HistoryStore};
use crate::services::ShortenResult;

pub const HINT_QUOTA: &str =
    "Check the relay's provider API key, or whether the account's link quota is used up.";
pub const HINT_SLUG_TAKEN: &str = "That custom slug is taken. Pick another one or leave it empty.";
pub const HINT_INVALID_URL: &str = "Enter a full address, for example https://example.com/page.";

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Submitting,
    Success(ShortenResult),
    Error {
        message: String,
        hint: Option<&'static str>,
    },
}

/// Credential badge. Session-local, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStatus {
    Connected,
    Error,
    Unknown,
}

/// Why a submission was refused before reaching the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitBlocked {
    InFlight,
    CredentialError,
}

impl std::fmt::Display for SubmitBlocked {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitBlocked::InFlight => f.write_str("A request is already in progress"),
            SubmitBlocked::CredentialError => {
                f.write_str("The relay's provider credential is not working")
            }
        }
    }
}

/// Extra guidance for well-known failure texts
pub fn error_hint(message: &str) -> Option<&'static str> {
    if message.contains("quota exceeded") {
        Some(HINT_QUOTA)
    } else if message.contains("already exists") {
        Some(HINT_SLUG_TAKEN)
    } else if message.contains("Invalid URL") {
        Some(HINT_INVALID_URL)
    } else {
        None
    }
}

pub struct ShortenView<B: ShortenBackend> {
    backend: B,
    history: HistoryStore,
    state: ViewState,
    badge: CredentialStatus,
}

impl<B: ShortenBackend> ShortenView<B> {
    pub fn new(backend: B, history: HistoryStore) -> Self {
        Self {
            backend,
            history,
            state: ViewState::Idle,
            badge: CredentialStatus::Unknown,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn badge(&self) -> CredentialStatus {
        self.badge
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryStore {
        &mut self.history
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// One credential probe. A relay that can't be reached leaves `Unknown`.
    pub async fn mount(&mut self) -> CredentialStatus {
        self.badge = match self.backend.test_credential().await {
            Ok(account) => {
                debug!("Credential probe ok for account {}", account.id);
                CredentialStatus::Connected
            }
            Err(e) if e.is_transport() => {
                warn!("Credential probe could not reach the relay: {}", e);
                CredentialStatus::Unknown
            }
            Err(e) => {
                warn!("Credential probe failed: {}", e);
                CredentialStatus::Error
            }
        };
        self.badge
    }

    /// Enter `Submitting`, unless a request is in flight or the badge is red.
    pub fn begin_submit(&mut self) -> Result<(), SubmitBlocked> {
        if self.state == ViewState::Submitting {
            return Err(SubmitBlocked::InFlight);
        }
        if self.badge == CredentialStatus::Error {
            return Err(SubmitBlocked::CredentialError);
        }
        self.state = ViewState::Submitting;
        Ok(())
    }

    /// Leave `Submitting` with the relay's answer. Success is recorded in
    /// history.
    pub fn finish_submit(&mut self, outcome: Result<ShortenResult, ClientError>) -> &ViewState {
        self.state = match outcome {
            Ok(result) => {
                info!("Shortened {} -> {}", result.original_url, result.short_url);
                self.history.record(HistoryEntry::from_result(&result));
                ViewState::Success(result)
            }
            Err(e) => {
                let message = e.message().to_string();
                ViewState::Error {
                    hint: error_hint(&message),
                    message,
                }
            }
        };
        &self.state
    }

    pub async fn submit(
        &mut self,
        url: &str,
        custom_slug: Option<&str>,
    ) -> Result<&ViewState, SubmitBlocked> {
        self.begin_submit()?;
        let outcome = self.backend.shorten(url, custom_slug).await;
        Ok(self.finish_submit(outcome))
    }

    /// Back to `Idle` from a finished submission.
    pub fn reset(&mut self) {
        if self.state != ViewState::Submitting {
            self.state = ViewState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_code::ApiErrorCode;
    use crate::history::MemoryStore;
    use crate::services::{AccountStats, AccountSummary, LinkLimit};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubBackend {
        probe: Result<AccountSummary, ClientError>,
        shorten: Result<ShortenResult, ClientError>,
        calls: AtomicUsize,
    }

    impl StubBackend {
        fn new(
            probe: Result<AccountSummary, ClientError>,
            shorten: Result<ShortenResult, ClientError>,
        ) -> Self {
            Self {
                probe,
                shorten,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ShortenBackend for StubBackend {
        async fn shorten(
            &self,
            _url: &str,
            _custom_slug: Option<&str>,
        ) -> Result<ShortenResult, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.shorten.clone()
        }

        async fn test_credential(&self) -> Result<AccountSummary, ClientError> {
            self.probe.clone()
        }

        async fn stats(&self) -> Result<AccountStats, ClientError> {
            Ok(AccountStats {
                links_created: 0,
                links_limit: LinkLimit::Unlimited,
                clicks_tracked: 0,
            })
        }
    }

    fn account() -> AccountSummary {
        AccountSummary {
            id: "acc".into(),
            email: None,
            full_name: None,
            created_at: None,
        }
    }

    fn result() -> ShortenResult {
        ShortenResult {
            short_url: "https://rebrand.ly/promo".into(),
            original_url: "https://example.com".into(),
            id: "l1".into(),
            custom_slug: Some("promo".into()),
            created_at: Utc::now(),
        }
    }

    fn api_error(message: &str) -> ClientError {
        ClientError::Api {
            status: 403,
            code: Some(ApiErrorCode::InvalidApiKey),
            message: message.into(),
        }
    }

    fn view(backend: StubBackend) -> ShortenView<StubBackend> {
        ShortenView::new(backend, HistoryStore::load(Arc::new(MemoryStore::new())))
    }

    #[test]
    fn test_error_hints() {
        assert_eq!(
            error_hint("Invalid API key or quota exceeded"),
            Some(HINT_QUOTA)
        );
        assert_eq!(error_hint("slashtag already exists"), Some(HINT_SLUG_TAKEN));
        assert_eq!(error_hint("Invalid URL format"), Some(HINT_INVALID_URL));
        assert_eq!(error_hint("something else"), None);
    }

    #[tokio::test]
    async fn test_mount_sets_badge() {
        let mut v = view(StubBackend::new(Ok(account()), Ok(result())));
        assert_eq!(v.badge(), CredentialStatus::Unknown);
        assert_eq!(v.mount().await, CredentialStatus::Connected);

        let mut v = view(StubBackend::new(Err(api_error("Invalid API key")), Ok(result())));
        assert_eq!(v.mount().await, CredentialStatus::Error);

        let mut v = view(StubBackend::new(
            Err(ClientError::Transport("refused".into())),
            Ok(result()),
        ));
        assert_eq!(v.mount().await, CredentialStatus::Unknown);
    }

    #[tokio::test]
    async fn test_submit_success_records_history() {
        let mut v = view(StubBackend::new(Ok(account()), Ok(result())));
        v.mount().await;

        let state = v.submit("example.com", Some("promo")).await.unwrap().clone();
        assert!(matches!(state, ViewState::Success(ref r) if r.short_url == "https://rebrand.ly/promo"));
        assert_eq!(v.history().len(), 1);
        assert_eq!(v.history().entries()[0].provider_id, "l1");

        v.reset();
        assert_eq!(v.state(), &ViewState::Idle);
    }

    #[tokio::test]
    async fn test_submit_failure_shows_message_and_hint() {
        let failure = ClientError::Api {
            status: 422,
            code: Some(ApiErrorCode::ValidationError),
            message: "slashtag already exists".into(),
        };
        let mut v = view(StubBackend::new(Ok(account()), Err(failure)));

        let state = v.submit("https://example.com", Some("taken")).await.unwrap();
        assert_eq!(
            state,
            &ViewState::Error {
                message: "slashtag already exists".into(),
                hint: Some(HINT_SLUG_TAKEN),
            }
        );
        assert!(v.history().is_empty());
    }

    #[tokio::test]
    async fn test_submit_blocked_by_credential_error() {
        let mut v = view(StubBackend::new(Err(api_error("Invalid API key")), Ok(result())));
        v.mount().await;

        let blocked = v.submit("https://example.com", None).await.unwrap_err();
        assert_eq!(blocked, SubmitBlocked::CredentialError);
        assert_eq!(v.backend().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_submit_blocked_while_in_flight() {
        let mut v = view(StubBackend::new(Ok(account()), Ok(result())));
        v.begin_submit().unwrap();
        assert_eq!(v.begin_submit(), Err(SubmitBlocked::InFlight));

        // reset does not abandon an in-flight request
        v.reset();
        assert_eq!(v.state(), &ViewState::Submitting);
    }
}
