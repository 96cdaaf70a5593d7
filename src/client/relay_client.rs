//! HTTP client for a running relay
//!
//! Same blocking-agent-on-the-blocking-pool pattern as the provider client.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;
use ureq::Agent;

use super::{ClientError, ShortenBackend};
use crate::api::services::{ErrorBody, ProbeResponse, ShortenPayload, ShortenResponse, StatsResponse};
use crate::config::ClientConfig;
use crate::services::{AccountStats, AccountSummary, ShortenResult};

pub struct RelayClient {
    base_url: String,
    agent: Agent,
}

impl RelayClient {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            base_url: config.api_base.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T>(&self, path: &str) -> Result<T, ClientError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let agent = self.agent.clone();
        let url = self.endpoint(path);
        debug!("GET {}", url);

        run_blocking(move || {
            let resp = agent
                .get(&url)
                .header("Accept", "application/json")
                .call()
                .map_err(transport_error)?;
            read_response(resp)
        })
        .await
    }

    async fn post<T>(&self, path: &str, body: ShortenPayload) -> Result<T, ClientError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let agent = self.agent.clone();
        let url = self.endpoint(path);
        debug!("POST {}", url);

        run_blocking(move || {
            let resp = agent
                .post(&url)
                .header("Accept", "application/json")
                .send_json(&body)
                .map_err(transport_error)?;
            read_response(resp)
        })
        .await
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, ClientError>
where
    F: FnOnce() -> Result<T, ClientError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .unwrap_or_else(|e| Err(ClientError::Transport(format!("blocking task failed: {}", e))))
}

fn transport_error(err: ureq::Error) -> ClientError {
    ClientError::Transport(err.to_string())
}

fn read_response<T: DeserializeOwned>(
    mut resp: ureq::http::Response<ureq::Body>,
) -> Result<T, ClientError> {
    let status = resp.status().as_u16();
    let text = resp
        .body_mut()
        .read_to_string()
        .map_err(transport_error)?;

    if (200..300).contains(&status) {
        return serde_json::from_str(&text)
            .map_err(|e| ClientError::Transport(format!("unexpected relay response: {}", e)));
    }

    // 非标准错误 body（例如限流中间件的纯文本 429）原样展示
    Err(match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => ClientError::Api {
            status,
            code: body.code,
            message: body.error,
        },
        Err(_) => ClientError::Api {
            status,
            code: None,
            message: if text.trim().is_empty() {
                format!("Relay answered with status {}", status)
            } else {
                text.trim().to_string()
            },
        },
    })
}

#[async_trait]
impl ShortenBackend for RelayClient {
    async fn shorten(
        &self,
        url: &str,
        custom_slug: Option<&str>,
    ) -> Result<ShortenResult, ClientError> {
        let payload = ShortenPayload {
            url: Some(url.to_string()),
            custom_slug: custom_slug.map(str::to_string),
        };
        let resp: ShortenResponse = self.post("/api/shorten", payload).await?;
        Ok(resp.result)
    }

    async fn test_credential(&self) -> Result<AccountSummary, ClientError> {
        let resp: ProbeResponse = self.get("/api/test").await?;
        Ok(resp.account)
    }

    async fn stats(&self) -> Result<AccountStats, ClientError> {
        let resp: StatsResponse = self.get("/api/stats").await?;
        Ok(resp.stats)
    }
}
