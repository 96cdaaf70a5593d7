use std::sync::Arc;

use actix_web::web;
use tracing::{debug, info, warn};

use crate::api::middleware::{RateLimitSettings, api_rate_limiter};
use crate::api::services::{AppStartTime, HealthService};
use crate::config::StaticConfig;
use crate::errors::Result;
use crate::provider::{LinkProvider, RebrandlyClient};
use crate::services::{CredentialProbe, ShortenService, ShortenSettings};

/// Shared server state, built once and handed to every worker.
///
/// `web::Data` is an `Arc`, so every worker sees the same services, and the
/// rate-limit settings carry one shared limiter store.
pub struct StartupContext {
    pub shorten_service: web::Data<ShortenService>,
    pub probe: web::Data<CredentialProbe>,
    pub health: web::Data<HealthService>,
    pub app_start_time: web::Data<AppStartTime>,
    pub rate_limit: RateLimitSettings,
}

/// 使用配置中的 provider 构建服务器上下文
pub fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    if config.provider.api_key.is_empty() {
        warn!(
            "No provider API key configured (REBRANDLY_API_KEY). \
             Every provider call will be rejected."
        );
    }

    let provider: Arc<dyn LinkProvider> = Arc::new(RebrandlyClient::new(&config.provider));
    info!(
        "Using link provider {} at {} (domain {})",
        provider.name(),
        config.provider.base_url,
        config.provider.default_domain
    );

    build_context(config, provider)
}

/// Build the context around an explicit provider. Tests pass a stub here.
pub fn build_context(
    config: &StaticConfig,
    provider: Arc<dyn LinkProvider>,
) -> Result<StartupContext> {
    let settings = ShortenSettings::from_config(&config.provider, config.server.environment);
    debug!(
        "Shorten settings: domain={}, expose_provider_detail={}",
        settings.default_domain, settings.expose_provider_detail
    );

    Ok(StartupContext {
        shorten_service: web::Data::new(ShortenService::new(provider.clone(), settings)),
        probe: web::Data::new(CredentialProbe::new(provider)),
        health: web::Data::new(HealthService::new()),
        app_start_time: web::Data::new(AppStartTime::now(config.server.environment)),
        rate_limit: api_rate_limiter(&config.rate_limit)?,
    })
}
