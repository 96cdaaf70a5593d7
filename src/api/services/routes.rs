//! API 路由配置

use actix_web::web;

use super::{probe, shorten};

/// Routes mounted under `/api`. The caller wraps the scope with the rate
/// limiter so every worker shares one limiter state.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/shorten", web::post().to(shorten::shorten))
        .route("/test", web::get().to(probe::test_credential))
        .route("/stats", web::get().to(probe::account_stats));
}
