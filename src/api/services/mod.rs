pub mod health;
pub mod helpers;
pub mod probe;
pub mod routes;
pub mod shorten;
pub mod types;

pub use crate::error_code::ApiErrorCode;
pub use health::{AppStartTime, HealthService, health_routes};
pub use helpers::{json_config, not_found};
pub use routes::api_routes;
pub use types::{
    ErrorBody, HealthResponse, MemoryUsage, ProbeResponse, ShortenPayload, ShortenResponse,
    StatsResponse,
};
