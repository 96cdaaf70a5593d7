//! Server mode
//!
//! Binds the HTTP relay and runs it until a shutdown signal arrives.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::{Method, header},
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::middleware::{RequestIdMiddleware, TimingMiddleware, rate_limit_middleware};
use crate::api::services::{api_routes, health_routes, json_config, not_found};
use crate::config::{CorsConfig, StaticConfig};
use crate::runtime::lifetime::{self, startup::StartupContext};

/// Upper bound on worker threads
const MAX_WORKERS: usize = 32;

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(cors: &CorsConfig) {
    if cors.allowed_origins.is_empty() {
        warn!(
            "CORS allowed_origins is empty. \
            No cross-origin requests will be allowed."
        );
    }
    if cors.allowed_origins.iter().any(|o| o == "*") {
        warn!("CORS allows any origin. Anyone can spend this relay's provider quota.");
    }
}

/// Build CORS middleware from configuration
///
/// Only the methods and headers the relay actually serves are allowed.
/// Credentials are never supported: the relay has no session.
pub fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    let mut cors = Cors::default();

    if cors_config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors.allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![header::HeaderName::from_static(
            crate::api::middleware::request_id::REQUEST_ID_HEADER,
        )])
        .max_age(cors_config.max_age as usize)
}

/// Assemble the application for one worker.
///
/// Middleware order, outermost first: timing, request id, CORS, compression.
/// The returned app owns clones of everything it needs from `ctx`.
pub fn build_app(
    ctx: &StartupContext,
    cors_config: &CorsConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody + use<>>,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .wrap(TimingMiddleware) // 最外层，记录请求延迟
        .wrap(RequestIdMiddleware)
        .wrap(build_cors_middleware(cors_config))
        .wrap(Compress::default())
        .wrap(
            DefaultHeaders::new()
                .add(("Cache-Control", "no-cache, no-store, must-revalidate"))
                .add(("X-Content-Type-Options", "nosniff")),
        )
        .app_data(ctx.shorten_service.clone())
        .app_data(ctx.probe.clone())
        .app_data(ctx.health.clone())
        .app_data(ctx.app_start_time.clone())
        .app_data(json_config())
        .service(
            web::scope("/api")
                .wrap(rate_limit_middleware(&ctx.rate_limit))
                .configure(api_routes),
        )
        .service(health_routes())
        .default_service(web::to(not_found))
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: Arc<StaticConfig>) -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup(&config).map_err(|e| {
        error!("Server startup failed: {}", e);
        e
    })?;

    let cpu_count = config.server.cpu_count.clamp(1, MAX_WORKERS);
    info!("Using {} worker threads", cpu_count);

    validate_cors_config(&config.cors);
    let cors_config = config.cors.clone();

    // 所有 worker 共享同一个限流状态
    let startup = Arc::new(startup);
    let server = HttpServer::new(move || build_app(&startup, &cors_config))
        .keep_alive(std::time::Duration::from_secs(30))
        .client_request_timeout(std::time::Duration::from_millis(5000))
        .client_disconnect_timeout(std::time::Duration::from_millis(1000))
        .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    warn!(
        "Starting relay at http://{} ({})",
        bind_address, config.server.environment
    );

    let server = server.run();
    let handle = server.handle();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            handle.stop(true).await;
            warn!("Graceful shutdown: server stopped");
        }
    }

    Ok(())
}
