use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::trace;

use super::types::{HealthResponse, MemoryUsage};
use crate::config::AppEnvironment;
use crate::utils::format_uptime;

// 应用启动信息
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: DateTime<Utc>,
    pub environment: AppEnvironment,
}

impl AppStartTime {
    pub fn now(environment: AppEnvironment) -> Self {
        Self {
            start_datetime: Utc::now(),
            environment,
        }
    }
}

/// Health Service
///
/// The relay is stateless, so health is liveness plus process memory. It
/// never calls the provider; use `/api/test` for that.
pub struct HealthService {
    system: Mutex<System>,
}

impl Default for HealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthService {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }

    /// Current process memory, zeros when the platform can't report it
    pub fn memory_usage(&self) -> MemoryUsage {
        let pid = Pid::from_u32(std::process::id());
        let mut sys = self.system.lock();
        // 只刷新当前进程
        sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        sys.process(pid)
            .map(|process| MemoryUsage {
                rss: process.memory(),
                virtual_bytes: process.virtual_memory(),
            })
            .unwrap_or_default()
    }

    pub async fn health_check(
        service: web::Data<HealthService>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        trace!("Received health check request");

        let now = Utc::now();
        let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

        let response = HealthResponse {
            status: "ok".to_string(),
            timestamp: now.to_rfc3339(),
            environment: app_start_time.environment.as_ref().to_string(),
            uptime,
            memory: service.memory_usage(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        };

        trace!("Health check ok, uptime {}", format_uptime(uptime));

        HttpResponse::Ok()
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .append_header(("Cache-Control", "no-cache, no-store, must-revalidate"))
            .json(response)
    }
}

/// `/health` scope
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
}
