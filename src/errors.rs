use std::fmt;

use actix_web::http::StatusCode;

use crate::error_code::ApiErrorCode;

#[derive(Debug, Clone)]
pub enum RelayError {
    Config(String),
    MissingUrl(String),
    InvalidUrl(String),
    InvalidSlug(String),
    ProviderAuth(String),
    ProviderValidation(String),
    ProviderRateLimit(String),
    ProviderTimeout(String),
    ProviderFailure(String),
    FileOperation(String),
    Serialization(String),
}

impl RelayError {
    /// 对外暴露的稳定错误码
    pub fn code(&self) -> ApiErrorCode {
        match self {
            RelayError::Config(_) => ApiErrorCode::InternalError,
            RelayError::MissingUrl(_) => ApiErrorCode::MissingUrl,
            RelayError::InvalidUrl(_) => ApiErrorCode::InvalidUrl,
            RelayError::InvalidSlug(_) => ApiErrorCode::InvalidSlug,
            RelayError::ProviderAuth(_) => ApiErrorCode::ApiKeyError,
            RelayError::ProviderValidation(_) => ApiErrorCode::ValidationError,
            RelayError::ProviderRateLimit(_) => ApiErrorCode::RateLimit,
            RelayError::ProviderTimeout(_) => ApiErrorCode::Timeout,
            RelayError::ProviderFailure(_) => ApiErrorCode::InternalError,
            RelayError::FileOperation(_) => ApiErrorCode::InternalError,
            RelayError::Serialization(_) => ApiErrorCode::InternalError,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            RelayError::MissingUrl(_) | RelayError::InvalidUrl(_) | RelayError::InvalidSlug(_) => {
                StatusCode::BAD_REQUEST
            }
            RelayError::ProviderAuth(_) => StatusCode::FORBIDDEN,
            RelayError::ProviderValidation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RelayError::ProviderRateLimit(_) => StatusCode::TOO_MANY_REQUESTS,
            RelayError::ProviderTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            RelayError::Config(_)
            | RelayError::ProviderFailure(_)
            | RelayError::FileOperation(_)
            | RelayError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            RelayError::Config(_) => "Configuration Error",
            RelayError::MissingUrl(_) => "Missing URL",
            RelayError::InvalidUrl(_) => "Invalid URL",
            RelayError::InvalidSlug(_) => "Invalid Slug",
            RelayError::ProviderAuth(_) => "Provider Authentication Error",
            RelayError::ProviderValidation(_) => "Provider Validation Error",
            RelayError::ProviderRateLimit(_) => "Provider Rate Limit",
            RelayError::ProviderTimeout(_) => "Provider Timeout",
            RelayError::ProviderFailure(_) => "Provider Failure",
            RelayError::FileOperation(_) => "File Operation Error",
            RelayError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            RelayError::Config(msg)
            | RelayError::MissingUrl(msg)
            | RelayError::InvalidUrl(msg)
            | RelayError::InvalidSlug(msg)
            | RelayError::ProviderAuth(msg)
            | RelayError::ProviderValidation(msg)
            | RelayError::ProviderRateLimit(msg)
            | RelayError::ProviderTimeout(msg)
            | RelayError::ProviderFailure(msg)
            | RelayError::FileOperation(msg)
            | RelayError::Serialization(msg) => msg,
        }
    }

    /// Input errors are rejected before any provider call is made.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RelayError::MissingUrl(_) | RelayError::InvalidUrl(_) | RelayError::InvalidSlug(_)
        )
    }

    /// 格式化为彩色输出（用于 CLI 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().as_ref().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for RelayError {}

// 便捷的构造函数
impl RelayError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        RelayError::Config(msg.into())
    }

    pub fn missing_url<T: Into<String>>(msg: T) -> Self {
        RelayError::MissingUrl(msg.into())
    }

    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        RelayError::InvalidUrl(msg.into())
    }

    pub fn invalid_slug<T: Into<String>>(msg: T) -> Self {
        RelayError::InvalidSlug(msg.into())
    }

    pub fn provider_auth<T: Into<String>>(msg: T) -> Self {
        RelayError::ProviderAuth(msg.into())
    }

    pub fn provider_validation<T: Into<String>>(msg: T) -> Self {
        RelayError::ProviderValidation(msg.into())
    }

    pub fn provider_rate_limit<T: Into<String>>(msg: T) -> Self {
        RelayError::ProviderRateLimit(msg.into())
    }

    pub fn provider_timeout<T: Into<String>>(msg: T) -> Self {
        RelayError::ProviderTimeout(msg.into())
    }

    pub fn provider_failure<T: Into<String>>(msg: T) -> Self {
        RelayError::ProviderFailure(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        RelayError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        RelayError::Serialization(msg.into())
    }
}

impl From<std::io::Error> for RelayError {
    fn from(err: std::io::Error) -> Self {
        RelayError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for RelayError {
    fn from(err: config::ConfigError) -> Self {
        RelayError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
