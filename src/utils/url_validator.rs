//! URL 验证模块
//!
//! 规范化（补全 scheme）并验证目标 URL，只接受 http/https

use url::Url;

/// URL 验证错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid URL protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::DangerousProtocol(proto) => {
                write!(f, "Invalid URL: protocol {} is not allowed", proto)
            }
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 危险协议列表
const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

/// 默认补全的 scheme
pub const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Whether `input` already starts with `scheme://`.
///
/// A bare `host:port` is not a scheme, which is why `Url::parse` alone can't
/// decide this.
fn has_scheme(input: &str) -> bool {
    let Some((scheme, _)) = input.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// 规范化 URL：去掉首尾空白，缺少 scheme 时补全 `https://`
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() || has_scheme(trimmed) {
        return trimmed.to_string();
    }
    format!("{}{}", DEFAULT_SCHEME_PREFIX, trimmed)
}

/// 验证 URL
///
/// 检查项目：
/// 1. URL 不为空
/// 2. 不是危险协议（javascript:, data:, file: 等）
/// 3. 必须是 http:// 或 https://
/// 4. URL 格式有效且包含 host
///
/// 不做 scheme 补全，调用方需先调用 [`normalize_url`]。
pub fn validate_url(url: &str) -> Result<Url, UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let url_lower = url.to_lowercase();

    for proto in DANGEROUS_PROTOCOLS {
        if url_lower.starts_with(proto) {
            return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
        }
    }

    if !url_lower.starts_with("http://") && !url_lower.starts_with("https://") {
        let proto = url_lower
            .split(':')
            .next()
            .map(|s| format!("{}:", s))
            .unwrap_or_default();
        return Err(UrlValidationError::InvalidProtocol(proto));
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    if parsed.host_str().is_none_or(|h| h.is_empty()) {
        return Err(UrlValidationError::InvalidFormat("missing host".to_string()));
    }

    Ok(parsed)
}

/// 规范化后再验证，返回规范化后的字符串
pub fn normalize_and_validate(input: &str) -> Result<String, UrlValidationError> {
    let normalized = normalize_url(input);
    validate_url(&normalized)?;
    Ok(normalized)
}

/// 获取 URL 验证错误的用户友好消息
pub fn validation_error_message(error: &UrlValidationError) -> &'static str {
    match error {
        UrlValidationError::EmptyUrl => "URL is required",
        UrlValidationError::InvalidProtocol(_) => "Invalid URL: must start with http:// or https://",
        UrlValidationError::DangerousProtocol(_) => "Invalid URL: this protocol is not allowed",
        UrlValidationError::InvalidFormat(_) => "Invalid URL format",
    }
}
