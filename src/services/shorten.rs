//! Shorten proxy service
//!
//! Validates a shorten request, forwards it to the provider and maps the
//! provider's answer onto local codes. Shared by the HTTP handler and tests.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::{AppEnvironment, ProviderConfig};
use crate::errors::{RelayError, Result};
use crate::provider::{CreateLinkRequest, DomainRef, LinkProvider, ProviderError, ProviderLink};
use crate::utils::url_validator::{normalize_and_validate, normalize_url, validation_error_message};
use crate::utils::{normalize_slug, validate_slug};

pub const MSG_MISSING_URL: &str = "URL is required";
pub const MSG_API_KEY: &str = "Invalid API key or quota exceeded";
pub const MSG_VALIDATION_FALLBACK: &str = "Invalid URL or slug already exists";
pub const MSG_RATE_LIMIT: &str = "Rate limit exceeded, please try again later";
pub const MSG_TIMEOUT: &str = "Request to the link provider timed out, please try again";
pub const MSG_INTERNAL: &str = "Failed to create short link";

// ============ Request/Response DTOs ============

/// Result of a successful shorten call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResult {
    pub short_url: String,
    pub original_url: String,
    /// Provider-side link id
    pub id: String,
    pub custom_slug: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Settings the service needs, copied out of the static config
#[derive(Debug, Clone)]
pub struct ShortenSettings {
    pub default_domain: String,
    /// 非 production 环境下在 INTERNAL_ERROR 中附带上游细节
    pub expose_provider_detail: bool,
}

impl ShortenSettings {
    pub fn from_config(provider: &ProviderConfig, environment: AppEnvironment) -> Self {
        Self {
            default_domain: provider.default_domain.clone(),
            expose_provider_detail: !environment.is_production(),
        }
    }
}

/// Shorten proxy
pub struct ShortenService {
    provider: Arc<dyn LinkProvider>,
    settings: ShortenSettings,
}

impl ShortenService {
    pub fn new(provider: Arc<dyn LinkProvider>, settings: ShortenSettings) -> Self {
        Self { provider, settings }
    }

    /// Validate input and build the provider request. No network I/O.
    ///
    /// 1. `MISSING_URL` when the url is absent or blank
    /// 2. `INVALID_URL` when the scheme-normalized url fails validation
    /// 3. `INVALID_SLUG` when a non-blank slug fails validation
    pub fn prepare(&self, url: Option<&str>, custom_slug: Option<&str>) -> Result<CreateLinkRequest> {
        let url = url.map(str::trim).unwrap_or_default();
        if url.is_empty() {
            return Err(RelayError::missing_url(MSG_MISSING_URL));
        }

        let destination = normalize_and_validate(url).map_err(|e| {
            RelayError::invalid_url(format!("{} ({})", validation_error_message(&e), e))
        })?;

        let slashtag = normalize_slug(custom_slug);
        validate_slug(slashtag.as_deref()).map_err(|e| RelayError::invalid_slug(e.to_string()))?;

        Ok(CreateLinkRequest {
            destination,
            domain: DomainRef {
                full_name: self.settings.default_domain.clone(),
            },
            slashtag,
        })
    }

    /// Validate, forward once, normalize the response.
    pub async fn shorten(&self, url: Option<&str>, custom_slug: Option<&str>) -> Result<ShortenResult> {
        let request = self.prepare(url, custom_slug)?;
        let original_url = request.destination.clone();
        let requested_slug = request.slashtag.clone();

        match self.provider.create_link(request).await {
            Ok(link) => {
                let result = build_result(link, original_url, requested_slug);
                info!(
                    "Short link created via {}: {} -> {}",
                    self.provider.name(),
                    result.short_url,
                    result.original_url
                );
                Ok(result)
            }
            Err(e) => {
                let mapped = map_provider_error(&e, self.settings.expose_provider_detail);
                match mapped {
                    RelayError::ProviderFailure(_) => {
                        error!("{} create-link failed: {}", self.provider.name(), e)
                    }
                    _ => warn!("{} create-link rejected: {}", self.provider.name(), e),
                }
                Err(mapped)
            }
        }
    }
}

fn build_result(
    link: ProviderLink,
    original_url: String,
    requested_slug: Option<String>,
) -> ShortenResult {
    let created_at = link
        .created_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    // customSlug only when the caller asked for one; prefer the provider's echo
    let custom_slug = requested_slug.map(|requested| link.slashtag.clone().unwrap_or(requested));

    ShortenResult {
        short_url: normalize_url(&link.short_url),
        original_url,
        id: link.id,
        custom_slug,
        created_at,
    }
}

/// Map a provider failure to a local error.
///
/// | provider        | local | code             |
/// |-----------------|-------|------------------|
/// | 403             | 403   | API_KEY_ERROR    |
/// | 422             | 422   | VALIDATION_ERROR |
/// | 429             | 429   | RATE_LIMIT       |
/// | timeout         | 408   | TIMEOUT          |
/// | anything else   | 500   | INTERNAL_ERROR   |
pub fn map_provider_error(err: &ProviderError, expose_detail: bool) -> RelayError {
    match err {
        ProviderError::Timeout => RelayError::provider_timeout(MSG_TIMEOUT),
        ProviderError::Status { status: 403, .. } => RelayError::provider_auth(MSG_API_KEY),
        ProviderError::Status { status: 422, .. } => RelayError::provider_validation(
            err.first_field_error()
                .unwrap_or_else(|| MSG_VALIDATION_FALLBACK.to_string()),
        ),
        ProviderError::Status { status: 429, .. } => RelayError::provider_rate_limit(MSG_RATE_LIMIT),
        other if expose_detail => RelayError::provider_failure(format!("{}: {}", MSG_INTERNAL, other)),
        _ => RelayError::provider_failure(MSG_INTERNAL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status(code: u16, body: serde_json::Value) -> ProviderError {
        ProviderError::Status { status: code, body }
    }

    #[test]
    fn test_map_403() {
        let err = map_provider_error(&status(403, json!({})), true);
        assert!(matches!(err, RelayError::ProviderAuth(_)));
        assert!(err.message().contains("quota exceeded"));
    }

    #[test]
    fn test_map_422_uses_first_field_error() {
        let err = map_provider_error(
            &status(422, json!({"errors": [{"message": "slashtag already exists"}]})),
            false,
        );
        assert_eq!(err.message(), "slashtag already exists");
        assert_eq!(err.http_status().as_u16(), 422);
    }

    #[test]
    fn test_map_422_fallback() {
        let err = map_provider_error(&status(422, json!({"message": "nope"})), false);
        assert_eq!(err.message(), MSG_VALIDATION_FALLBACK);
    }

    #[test]
    fn test_map_429_and_timeout() {
        assert_eq!(
            map_provider_error(&status(429, json!(null)), false).http_status().as_u16(),
            429
        );
        assert_eq!(
            map_provider_error(&ProviderError::Timeout, false).http_status().as_u16(),
            408
        );
    }

    #[test]
    fn test_map_other_hides_detail_in_production() {
        let err = map_provider_error(&status(502, json!({"message": "upstream exploded"})), false);
        assert_eq!(err.message(), MSG_INTERNAL);

        let err = map_provider_error(&status(502, json!({"message": "upstream exploded"})), true);
        assert!(err.message().contains("upstream exploded"));
        assert_eq!(err.http_status().as_u16(), 500);
    }

    #[test]
    fn test_build_result_adds_scheme_and_slug() {
        let link = ProviderLink {
            id: "l1".to_string(),
            short_url: "rebrand.ly/promo".to_string(),
            destination: None,
            slashtag: Some("promo".to_string()),
            created_at: Some("2024-05-01T10:00:00.000Z".to_string()),
        };
        let result = build_result(link, "https://example.com".to_string(), Some("promo".to_string()));
        assert_eq!(result.short_url, "https://rebrand.ly/promo");
        assert_eq!(result.custom_slug.as_deref(), Some("promo"));
        assert_eq!(result.created_at.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_build_result_without_requested_slug() {
        let link = ProviderLink {
            id: "l2".to_string(),
            short_url: "https://rebrand.ly/x1y2".to_string(),
            destination: None,
            slashtag: Some("x1y2".to_string()),
            created_at: None,
        };
        let result = build_result(link, "https://example.com".to_string(), None);
        assert_eq!(result.short_url, "https://rebrand.ly/x1y2");
        assert_eq!(result.custom_slug, None);
    }
}
