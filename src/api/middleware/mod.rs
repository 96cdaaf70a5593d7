pub mod rate_limit;
pub mod request_id;
pub mod timing;

pub use rate_limit::{
    ClientIpKeyExtractor, RateLimitSettings, RelayRateLimiter, api_rate_limiter,
    rate_limit_middleware,
};
pub use request_id::{RequestId, RequestIdMiddleware};
pub use timing::TimingMiddleware;
