//! API 帮助函数

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error_code::ApiErrorCode;
use super::types::ErrorBody;
use crate::errors::RelayError;

/// Request bodies larger than this are rejected
pub const MAX_JSON_BODY_BYTES: usize = 16 * 1024;

pub const MSG_INVALID_REQUEST: &str = "Request body must be a JSON object";
pub const MSG_NOT_FOUND: &str = "Route not found";

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(body)
}

/// 构建错误响应 `{success:false, error, code}`
pub fn error_response(status: StatusCode, code: ApiErrorCode, message: &str) -> HttpResponse {
    json_response(status, &ErrorBody::new(message, Some(code)))
}

/// 从 RelayError 构建错误响应（自动映射 HTTP 状态码和错误码）
pub fn error_from_relay(err: &RelayError) -> HttpResponse {
    error_response(err.http_status(), err.code(), err.message())
}

/// JSON extractor config: malformed or non-JSON bodies become
/// 400 `INVALID_REQUEST` in the common error shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_BODY_BYTES)
        .error_handler(|err: JsonPayloadError, req: &HttpRequest| {
            warn!("Rejected request body on {}: {}", req.path(), err);
            let response = error_response(
                StatusCode::BAD_REQUEST,
                ApiErrorCode::InvalidRequest,
                MSG_INVALID_REQUEST,
            );
            InternalError::from_response(err, response).into()
        })
}

/// Fallback for unmatched routes
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    debug!("No route for {} {}", req.method(), req.path());
    error_response(StatusCode::NOT_FOUND, ApiErrorCode::NotFound, MSG_NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_error_from_relay_shape() {
        let resp = error_from_relay(&RelayError::invalid_slug("too short"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "INVALID_SLUG");
        assert_eq!(json["error"], "too short");
        assert!(json.get("details").is_none());
    }
}
