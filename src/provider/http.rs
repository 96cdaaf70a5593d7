//! Rebrandly-compatible REST client
//!
//! ureq is blocking, so every call runs inside `spawn_blocking`. Each
//! operation has its own agent because the bounded waits differ
//! (create-link vs. account probe).

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace, warn};
use ureq::Agent;

use super::LinkProvider;
use super::types::{CreateLinkRequest, ProviderAccount, ProviderError, ProviderLink};
use crate::config::ProviderConfig;

/// 认证 header 名称
const API_KEY_HEADER: &str = "apikey";

pub struct RebrandlyClient {
    base_url: String,
    api_key: String,
    create_agent: Agent,
    probe_agent: Agent,
}

fn build_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        // 4xx/5xx 需要读取 body 做错误映射
        .http_status_as_error(false)
        .build()
        .into()
}

impl RebrandlyClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            create_agent: build_agent(Duration::from_secs(config.create_timeout_secs)),
            probe_agent: build_agent(Duration::from_secs(config.probe_timeout_secs)),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post_link_sync(
        agent: Agent,
        url: String,
        api_key: String,
        body: CreateLinkRequest,
    ) -> Result<ProviderLink, ProviderError> {
        let resp = agent
            .post(&url)
            .header(API_KEY_HEADER, api_key.as_str())
            .header("Accept", "application/json")
            .send_json(&body)
            .map_err(map_transport_error)?;
        read_response(resp)
    }

    fn get_account_sync(
        agent: Agent,
        url: String,
        api_key: String,
    ) -> Result<ProviderAccount, ProviderError> {
        let resp = agent
            .get(&url)
            .header(API_KEY_HEADER, api_key.as_str())
            .header("Accept", "application/json")
            .call()
            .map_err(map_transport_error)?;
        read_response(resp)
    }
}

/// Turn a response into either the decoded body or a status error.
fn read_response<T: DeserializeOwned>(
    mut resp: ureq::http::Response<ureq::Body>,
) -> Result<T, ProviderError> {
    let status = resp.status().as_u16();
    let text = resp
        .body_mut()
        .read_to_string()
        .map_err(map_transport_error)?;

    if !(200..300).contains(&status) {
        // 非 JSON 的错误 body 原样保留为字符串
        let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
        trace!("Provider error response {}: {}", status, body);
        return Err(ProviderError::Status { status, body });
    }

    serde_json::from_str(&text).map_err(|e| ProviderError::Decode(e.to_string()))
}

fn map_transport_error(err: ureq::Error) -> ProviderError {
    match err {
        ureq::Error::Timeout(_) => ProviderError::Timeout,
        ureq::Error::Io(ref e) if e.kind() == std::io::ErrorKind::TimedOut => {
            ProviderError::Timeout
        }
        ureq::Error::StatusCode(status) => ProviderError::Status {
            status,
            body: Value::Null,
        },
        other => ProviderError::Transport(other.to_string()),
    }
}

fn join_error(e: tokio::task::JoinError) -> ProviderError {
    warn!("Provider spawn_blocking failed: {}", e);
    ProviderError::Transport(format!("blocking task failed: {}", e))
}

#[async_trait]
impl LinkProvider for RebrandlyClient {
    async fn create_link(&self, request: CreateLinkRequest) -> Result<ProviderLink, ProviderError> {
        let agent = self.create_agent.clone();
        let url = self.endpoint("/links");
        let api_key = self.api_key.clone();

        debug!(
            "Creating link on provider: destination={}, slashtag={:?}",
            request.destination, request.slashtag
        );

        tokio::task::spawn_blocking(move || Self::post_link_sync(agent, url, api_key, request))
            .await
            .unwrap_or_else(|e| Err(join_error(e)))
    }

    async fn get_account(&self) -> Result<ProviderAccount, ProviderError> {
        let agent = self.probe_agent.clone();
        let url = self.endpoint("/account");
        let api_key = self.api_key.clone();

        tokio::task::spawn_blocking(move || Self::get_account_sync(agent, url, api_key))
            .await
            .unwrap_or_else(|e| Err(join_error(e)))
    }

    fn name(&self) -> &'static str {
        "Rebrandly"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::DomainRef;

    fn client_for(base_url: &str, timeout_secs: u64) -> RebrandlyClient {
        RebrandlyClient::new(&ProviderConfig {
            api_key: "test-key".to_string(),
            base_url: base_url.to_string(),
            create_timeout_secs: timeout_secs,
            probe_timeout_secs: timeout_secs,
            ..Default::default()
        })
    }

    fn request(slashtag: Option<&str>) -> CreateLinkRequest {
        CreateLinkRequest {
            destination: "https://example.com".to_string(),
            domain: DomainRef {
                full_name: "rebrand.ly".to_string(),
            },
            slashtag: slashtag.map(str::to_string),
        }
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = client_for("https://api.example.com/v1/", 5);
        assert_eq!(client.endpoint("/links"), "https://api.example.com/v1/links");
    }

    #[tokio::test]
    async fn test_create_link_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/links")
            .match_header("apikey", "test-key")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"destination":"https://example.com","slashtag":"promo"}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"abc123","shortUrl":"rebrand.ly/promo","slashtag":"promo","createdAt":"2024-05-01T10:00:00.000Z"}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server.url(), 5);
        let link = client.create_link(request(Some("promo"))).await.unwrap();

        assert_eq!(link.id, "abc123");
        assert_eq!(link.short_url, "rebrand.ly/promo");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_link_status_error_keeps_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/links")
            .with_status(422)
            .with_body(r#"{"errors":[{"message":"slashtag already exists"}]}"#)
            .create_async()
            .await;

        let client = client_for(&server.url(), 5);
        let err = client.create_link(request(Some("taken"))).await.unwrap_err();

        assert_eq!(err.status(), Some(422));
        assert_eq!(
            err.first_field_error().as_deref(),
            Some("slashtag already exists")
        );
    }

    #[tokio::test]
    async fn test_account_forbidden() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/account")
            .with_status(403)
            .with_body("forbidden")
            .create_async()
            .await;

        let client = client_for(&server.url(), 5);
        let err = client.get_account().await.unwrap_err();
        assert_eq!(err.status(), Some(403));
    }

    #[tokio::test]
    async fn test_account_reads_subscription_limits() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/account")
            .match_header("apikey", "test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"acc1","username":"ops","email":"ops@example.com","fullName":"Ops","subscription":{"category":"Free","limits":{"links":{"used":42,"max":500},"clicks":{"used":7}}}}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server.url(), 5);
        let account = client.get_account().await.unwrap();

        assert_eq!(account.id, "acc1");
        assert_eq!(account.full_name.as_deref(), Some("Ops"));
        assert_eq!(account.link_quota().used, Some(42));
        assert_eq!(account.link_quota().max, Some(500));
        assert_eq!(account.click_quota().used, Some(7));
    }

    #[tokio::test]
    async fn test_undecodable_success_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/links")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = client_for(&server.url(), 5);
        let err = client.create_link(request(None)).await.unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)));
    }

    #[tokio::test]
    async fn test_silent_provider_times_out() {
        // accepts the connection but never answers
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let held: Vec<_> = listener.incoming().take(1).collect();
            std::thread::sleep(Duration::from_secs(5));
            drop(held);
        });

        let client = client_for(&format!("http://{}", addr), 1);
        let err = client.create_link(request(None)).await.unwrap_err();
        assert_eq!(err, ProviderError::Timeout);
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_transport_error() {
        // bind then drop to get a port nobody listens on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = client_for(&format!("http://127.0.0.1:{}", port), 2);
        let err = client.get_account().await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)), "got: {:?}", err);
    }
}
