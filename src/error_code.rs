//! 统一 API 错误码定义

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

/// API 错误码枚举
///
/// 序列化为 SCREAMING_SNAKE_CASE 字符串，前端按 code 分支，不解析 message。
/// - 输入校验：MISSING_URL / INVALID_URL / INVALID_SLUG / INVALID_REQUEST
/// - 上游错误：API_KEY_ERROR / VALIDATION_ERROR / RATE_LIMIT / TIMEOUT / INTERNAL_ERROR
/// - 凭证探测：INVALID_API_KEY / TEST_FAILED
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    MissingUrl,
    InvalidUrl,
    InvalidSlug,
    InvalidRequest,
    ApiKeyError,
    ValidationError,
    RateLimit,
    Timeout,
    InternalError,
    InvalidApiKey,
    TestFailed,
    NotFound,
}

impl std::fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_serde_matches_strum() {
        for code in ApiErrorCode::iter() {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_ref()));
        }
    }

    #[test]
    fn test_api_layer_reexports_same_type() {
        let code: crate::api::services::ApiErrorCode = ApiErrorCode::RateLimit;
        assert_eq!(code, crate::errors::RelayError::provider_rate_limit("slow down").code());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(ApiErrorCode::ApiKeyError.as_ref(), "API_KEY_ERROR");
        assert_eq!(ApiErrorCode::InvalidApiKey.as_ref(), "INVALID_API_KEY");
        assert_eq!(ApiErrorCode::MissingUrl.to_string(), "MISSING_URL");
    }
}
