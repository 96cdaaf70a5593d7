//! Per-client-IP rate limiting for `/api/*`
//!
//! governor 是 GCRA 限流：把 `window_ms` 内 `max_requests` 次换算为
//! 每 `window_ms / max_requests` 补充一个令牌、突发上限 `max_requests`。
//! 效果上接近滑动窗口，但不是逐请求计数。

use std::time::Duration;

use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError,
};
use actix_web::dev::ServiceRequest;
use governor::middleware::NoOpMiddleware;
use tracing::{debug, info};

use crate::config::RateLimitConfig;
use crate::errors::{RelayError, Result};

/// Key used when the peer address is not available (e.g. in-process tests)
const UNKNOWN_CLIENT_KEY: &str = "unknown";

/// 基于客户端 IP 的限流 key 提取器
///
/// - 默认使用 TCP 连接 IP，无法伪造
/// - `trust_forwarded_for` 开启时使用 `X-Forwarded-For` / `Forwarded`，
///   仅应在可信反向代理之后开启
#[derive(Clone, Copy, Debug)]
pub struct ClientIpKeyExtractor {
    trust_forwarded_for: bool,
}

impl ClientIpKeyExtractor {
    pub fn new(trust_forwarded_for: bool) -> Self {
        Self {
            trust_forwarded_for,
        }
    }
}

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> std::result::Result<Self::Key, Self::KeyExtractionError> {
        let conn_info = req.connection_info();

        let ip = if self.trust_forwarded_for {
            conn_info.realip_remote_addr()
        } else {
            conn_info.peer_addr()
        };

        match ip {
            Some(ip) => Ok(ip.to_string()),
            None => {
                debug!("Rate limit: no client address, using shared bucket");
                Ok(UNKNOWN_CLIENT_KEY.to_string())
            }
        }
    }
}

pub type RelayRateLimiter = Governor<ClientIpKeyExtractor, NoOpMiddleware>;

/// Limiter config. Its key/state store is shared by every `Governor`
/// created from it.
pub type RateLimitSettings = GovernorConfig<ClientIpKeyExtractor, NoOpMiddleware>;

/// Replenish interval for one request under the configured window.
pub fn replenish_period(config: &RateLimitConfig) -> Duration {
    let per_request = config.window_ms / u64::from(config.max_requests.max(1));
    Duration::from_millis(per_request.max(1))
}

/// Build the limiter config once at startup. Each worker wraps its `/api`
/// scope with `Governor::new(&settings)`; all of them share one state store.
pub fn api_rate_limiter(config: &RateLimitConfig) -> Result<RateLimitSettings> {
    if config.max_requests == 0 || config.window_ms == 0 {
        return Err(RelayError::config(
            "rate_limit.max_requests and rate_limit.window_ms must be greater than 0",
        ));
    }

    let period = replenish_period(config);
    let governor_config = GovernorConfigBuilder::default()
        .period(period)
        .burst_size(config.max_requests)
        .key_extractor(ClientIpKeyExtractor::new(config.trust_forwarded_for))
        .finish()
        .ok_or_else(|| RelayError::config("Invalid rate limit configuration"))?;

    info!(
        "API rate limiter: {} requests per {}ms (one token every {:?}), forwarded-for {}",
        config.max_requests,
        config.window_ms,
        period,
        if config.trust_forwarded_for { "trusted" } else { "ignored" }
    );

    Ok(governor_config)
}

pub fn rate_limit_middleware(settings: &RateLimitSettings) -> RelayRateLimiter {
    Governor::new(settings)
}
