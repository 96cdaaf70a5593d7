//! Credential probe
//!
//! Read-only calls against the provider's account endpoint: one to confirm
//! the configured key works, one to report usage counters.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::{info, warn};

use crate::error_code::ApiErrorCode;
use crate::provider::{LinkProvider, ProviderAccount, ProviderError};

pub const MSG_PROBE_OK: &str = "API key is valid";
pub const MSG_INVALID_KEY: &str = "Invalid API key";
pub const MSG_PROBE_FAILED: &str = "Failed to reach the link provider";
pub const UNLIMITED_LABEL: &str = "Unlimited";

/// Account fields exposed by `GET /api/test`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub created_at: Option<String>,
}

impl From<ProviderAccount> for AccountSummary {
    fn from(account: ProviderAccount) -> Self {
        Self {
            id: account.id,
            email: account.email,
            full_name: account.full_name,
            created_at: account.created_at,
        }
    }
}

/// Link quota: a number, or the literal `"Unlimited"` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkLimit {
    Limited(u64),
    Unlimited,
}

impl Serialize for LinkLimit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LinkLimit::Limited(n) => serializer.serialize_u64(*n),
            LinkLimit::Unlimited => serializer.serialize_str(UNLIMITED_LABEL),
        }
    }
}

impl<'de> Deserialize<'de> for LinkLimit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(u64),
            Label(String),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Count(n) => LinkLimit::Limited(n),
            Raw::Label(_) => LinkLimit::Unlimited,
        })
    }
}

impl std::fmt::Display for LinkLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkLimit::Limited(n) => write!(f, "{}", n),
            LinkLimit::Unlimited => f.write_str(UNLIMITED_LABEL),
        }
    }
}

/// Usage counters, defaulted when the provider omits them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    pub links_created: u64,
    pub links_limit: LinkLimit,
    pub clicks_tracked: u64,
}

impl From<&ProviderAccount> for AccountStats {
    fn from(account: &ProviderAccount) -> Self {
        let links = account.link_quota();
        let clicks = account.click_quota();
        Self {
            links_created: links.used.unwrap_or(0),
            links_limit: links.max.map_or(LinkLimit::Unlimited, LinkLimit::Limited),
            clicks_tracked: clicks.used.unwrap_or(0),
        }
    }
}

/// Probe failure. `details` is for diagnostics only.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeFailure {
    pub code: ApiErrorCode,
    pub error: String,
    pub details: Value,
}

impl ProbeFailure {
    fn from_provider(err: &ProviderError) -> Self {
        let (code, error) = match err.status() {
            Some(403) => (ApiErrorCode::InvalidApiKey, MSG_INVALID_KEY),
            _ => (ApiErrorCode::TestFailed, MSG_PROBE_FAILED),
        };
        Self {
            code,
            error: error.to_string(),
            details: err.diagnostic(),
        }
    }
}

pub struct CredentialProbe {
    provider: Arc<dyn LinkProvider>,
}

impl CredentialProbe {
    pub fn new(provider: Arc<dyn LinkProvider>) -> Self {
        Self { provider }
    }

    /// Confirm the configured credential against the account endpoint.
    pub async fn test(&self) -> Result<AccountSummary, ProbeFailure> {
        match self.provider.get_account().await {
            Ok(account) => {
                info!("{} credential probe succeeded", self.provider.name());
                Ok(account.into())
            }
            Err(e) => {
                warn!("{} credential probe failed: {}", self.provider.name(), e);
                Err(ProbeFailure::from_provider(&e))
            }
        }
    }

    /// Account usage counters.
    pub async fn stats(&self) -> Result<AccountStats, ProviderError> {
        let account = self.provider.get_account().await.inspect_err(|e| {
            warn!("{} stats request failed: {}", self.provider.name(), e);
        })?;
        Ok(AccountStats::from(&account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::AccountQuota;
    use serde_json::json;

    #[test]
    fn test_stats_defaults() {
        let stats = AccountStats::from(&ProviderAccount::default());
        assert_eq!(stats.links_created, 0);
        assert_eq!(stats.links_limit, LinkLimit::Unlimited);
        assert_eq!(stats.clicks_tracked, 0);
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            json!({"linksCreated": 0, "linksLimit": "Unlimited", "clicksTracked": 0})
        );
    }

    #[test]
    fn test_stats_from_account() {
        let account = ProviderAccount {
            links: Some(AccountQuota {
                used: Some(12),
                max: Some(500),
            }),
            clicks: Some(AccountQuota {
                used: Some(40),
                max: None,
            }),
            ..Default::default()
        };
        let stats = AccountStats::from(&account);
        assert_eq!(stats.links_limit, LinkLimit::Limited(500));
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            json!({"linksCreated": 12, "linksLimit": 500, "clicksTracked": 40})
        );
    }

    #[test]
    fn test_stats_from_subscription_limits() {
        let account: ProviderAccount = serde_json::from_value(json!({
            "id": "acc1",
            "email": "ops@example.com",
            "links": {"used": 1, "max": 2},
            "subscription": {
                "category": "Free",
                "limits": {
                    "links": {"used": 42, "max": 500},
                    "clicks": {"used": 7}
                }
            }
        }))
        .unwrap();

        let stats = AccountStats::from(&account);
        assert_eq!(
            stats,
            AccountStats {
                links_created: 42,
                links_limit: LinkLimit::Limited(500),
                clicks_tracked: 7,
            }
        );
    }

    #[test]
    fn test_stats_partial_subscription_falls_back() {
        // subscription 里没有 clicks 时读取顶层字段
        let account: ProviderAccount = serde_json::from_value(json!({
            "id": "acc1",
            "clicks": {"used": 9},
            "subscription": {"limits": {"links": {"used": 3}}}
        }))
        .unwrap();

        let stats = AccountStats::from(&account);
        assert_eq!(stats.links_created, 3);
        assert_eq!(stats.links_limit, LinkLimit::Unlimited);
        assert_eq!(stats.clicks_tracked, 9);
    }

    #[test]
    fn test_link_limit_deserialize() {
        let limited: LinkLimit = serde_json::from_value(json!(25)).unwrap();
        let unlimited: LinkLimit = serde_json::from_value(json!("Unlimited")).unwrap();
        assert_eq!(limited, LinkLimit::Limited(25));
        assert_eq!(unlimited, LinkLimit::Unlimited);
    }

    #[test]
    fn test_probe_failure_codes() {
        let forbidden = ProviderError::Status {
            status: 403,
            body: json!({"message": "Unauthorized"}),
        };
        let failure = ProbeFailure::from_provider(&forbidden);
        assert_eq!(failure.code, ApiErrorCode::InvalidApiKey);
        assert_eq!(failure.details["status"], 403);

        let failure = ProbeFailure::from_provider(&ProviderError::Timeout);
        assert_eq!(failure.code, ApiErrorCode::TestFailed);

        let server_error = ProviderError::Status {
            status: 500,
            body: json!(null),
        };
        assert_eq!(
            ProbeFailure::from_provider(&server_error).code,
            ApiErrorCode::TestFailed
        );
    }
}
