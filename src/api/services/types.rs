//! Wire types of the HTTP API
//!
//! Shared by the handlers (serialize) and the terminal client (deserialize).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error_code::ApiErrorCode;
use crate::services::{AccountStats, AccountSummary, ShortenResult};

/// `POST /api/shorten` body. Both fields optional so a missing url maps to
/// `MISSING_URL` instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenPayload {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: ShortenResult,
}

/// Failure body shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ApiErrorCode>,
    /// 仅用于诊断，调用方不应据此分支
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, code: Option<ApiErrorCode>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResponse {
    pub success: bool,
    pub message: String,
    pub account: AccountSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: AccountStats,
}

/// Process memory in bytes
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemoryUsage {
    pub rss: u64,
    #[serde(rename = "virtual")]
    pub virtual_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub environment: String,
    /// seconds since start
    pub uptime: u64,
    pub memory: MemoryUsage,
    pub version: String,
}
