//! 配置值验证模块
//!
//! 启动时检查一次：错误会阻止服务启动，警告只记录日志。

use url::Url;

use super::StaticConfig;

/// 验证结果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ConfigReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// 验证静态配置
///
/// - 缺少 API key：警告（服务仍可启动，凭证探测会报告 error）
/// - 端口、超时、限流阈值为 0：错误
/// - provider.base_url 不是 http(s) URL：错误
/// - CORS 来源无法解析：警告
pub fn validate_config(config: &StaticConfig) -> ConfigReport {
    let mut report = ConfigReport::default();

    if config.provider.api_key.trim().is_empty() {
        report.warnings.push(
            "provider.api_key is empty; every provider call will be rejected".to_string(),
        );
    }

    if config.server.port == 0 {
        report.errors.push("server.port must be greater than 0".to_string());
    }

    match Url::parse(&config.provider.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => report.errors.push(format!(
            "provider.base_url must use http or https, got '{}'",
            url.scheme()
        )),
        Err(e) => report.errors.push(format!(
            "provider.base_url '{}' is not a valid URL: {}",
            config.provider.base_url, e
        )),
    }

    if config.provider.default_domain.trim().is_empty() {
        report
            .errors
            .push("provider.default_domain must not be empty".to_string());
    }

    if config.provider.create_timeout_secs == 0 {
        report
            .errors
            .push("provider.create_timeout_secs must be greater than 0".to_string());
    }

    if config.provider.probe_timeout_secs == 0 {
        report
            .errors
            .push("provider.probe_timeout_secs must be greater than 0".to_string());
    }

    if config.rate_limit.max_requests == 0 {
        report
            .errors
            .push("rate_limit.max_requests must be greater than 0".to_string());
    }

    if config.rate_limit.window_ms == 0 {
        report
            .errors
            .push("rate_limit.window_ms must be greater than 0".to_string());
    }

    for origin in &config.cors.allowed_origins {
        if origin != "*" && Url::parse(origin).is_err() {
            report
                .warnings
                .push(format!("cors.allowed_origins entry '{}' is not a valid origin", origin));
        }
    }

    if !matches!(config.logging.format.as_str(), "text" | "json") {
        report.warnings.push(format!(
            "logging.format '{}' is unknown, falling back to text",
            config.logging.format
        ));
    }

    report
}
