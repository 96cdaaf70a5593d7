//! Link-shortening provider abstraction
//!
//! The relay talks to the provider through [`LinkProvider`], so the HTTP
//! implementation can be swapped for a stub in tests.

mod http;
mod types;

pub use http::RebrandlyClient;
pub use types::{
    AccountLimits, AccountQuota, AccountSubscription, CreateLinkRequest, DomainRef,
    ProviderAccount, ProviderError, ProviderLink,
};

use async_trait::async_trait;

/// 短链服务商接口
#[async_trait]
pub trait LinkProvider: Send + Sync {
    /// `POST /links`. Exactly one attempt, never retried.
    async fn create_link(&self, request: CreateLinkRequest) -> Result<ProviderLink, ProviderError>;

    /// `GET /account`, used both as credential probe and for stats.
    async fn get_account(&self) -> Result<ProviderAccount, ProviderError>;

    /// provider 名称（用于日志）
    fn name(&self) -> &'static str;
}
