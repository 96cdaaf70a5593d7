use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Domain reference in the create-link body: `{"fullName": "rebrand.ly"}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DomainRef {
    pub full_name: String,
}

/// Body of `POST /links`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    pub destination: String,
    pub domain: DomainRef,
    /// 未提供时由服务商自动生成
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slashtag: Option<String>,
}

/// Link as returned by the provider. Only the fields the relay reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderLink {
    pub id: String,
    pub short_url: String,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub slashtag: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// 配额计数，例如 `{"used": 12, "max": 500}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountQuota {
    #[serde(default)]
    pub used: Option<u64>,
    #[serde(default)]
    pub max: Option<u64>,
}

/// `subscription.limits` 下的用量计数
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountLimits {
    #[serde(default)]
    pub links: Option<AccountQuota>,
    #[serde(default)]
    pub clicks: Option<AccountQuota>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountSubscription {
    #[serde(default)]
    pub limits: Option<AccountLimits>,
}

/// Account as returned by `GET /account`
///
/// Usage counters normally live under `subscription.limits`; the top-level
/// `links` / `clicks` objects are read when that block is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAccount {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub links: Option<AccountQuota>,
    #[serde(default)]
    pub clicks: Option<AccountQuota>,
    #[serde(default)]
    pub subscription: Option<AccountSubscription>,
}

impl ProviderAccount {
    fn limits(&self) -> Option<&AccountLimits> {
        self.subscription.as_ref()?.limits.as_ref()
    }

    /// Link counter, preferring `subscription.limits.links`
    pub fn link_quota(&self) -> AccountQuota {
        self.limits()
            .and_then(|l| l.links.as_ref())
            .or(self.links.as_ref())
            .cloned()
            .unwrap_or_default()
    }

    /// Click counter, preferring `subscription.limits.clicks`
    pub fn click_quota(&self) -> AccountQuota {
        self.limits()
            .and_then(|l| l.clicks.as_ref())
            .or(self.clicks.as_ref())
            .cloned()
            .unwrap_or_default()
    }
}

/// Provider call failure
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Provider answered with a non-2xx status
    Status { status: u16, body: Value },
    /// No response within the bounded wait
    Timeout,
    /// Connection / TLS / DNS failure
    Transport(String),
    /// 2xx response whose body didn't match the expected shape
    Decode(String),
}

impl ProviderError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `errors[0].message` from a provider validation response
    pub fn first_field_error(&self) -> Option<String> {
        let ProviderError::Status { body, .. } = self else {
            return None;
        };
        body.get("errors")?
            .as_array()?
            .first()?
            .get("message")?
            .as_str()
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string)
    }

    /// Top-level `message` of an error body, if any
    pub fn provider_message(&self) -> Option<String> {
        let ProviderError::Status { body, .. } = self else {
            return None;
        };
        body.get("message")?.as_str().map(str::to_string)
    }

    /// Raw error for diagnostics. Callers must not branch on it.
    pub fn diagnostic(&self) -> Value {
        match self {
            ProviderError::Status { status, body } => {
                serde_json::json!({ "status": status, "body": body })
            }
            ProviderError::Timeout => serde_json::json!({ "error": "timeout" }),
            ProviderError::Transport(msg) => serde_json::json!({ "error": msg }),
            ProviderError::Decode(msg) => serde_json::json!({ "error": msg }),
        }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::Status { status, .. } => match self.provider_message() {
                Some(msg) => write!(f, "provider returned {}: {}", status, msg),
                None => write!(f, "provider returned {}", status),
            },
            ProviderError::Timeout => write!(f, "provider did not respond in time"),
            ProviderError::Transport(msg) => write!(f, "provider unreachable: {}", msg),
            ProviderError::Decode(msg) => write!(f, "unexpected provider response: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}
