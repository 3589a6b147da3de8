//! `reqwest` implementation of [`DashboardBackend`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use twin_core::config::BackendConfig;
use twin_core::Domain;

use crate::endpoints;
use crate::error::BackendError;
use crate::types::{
    ChatReply, ChatRequest, DomainStats, OptimizeRequest, OptimizeResponse, SpeakRequest,
    SynthesisOutcome, SystemMetrics,
};
use crate::DashboardBackend;

/// HTTP client for the dashboard backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a client for `config.base_url` with the configured timeout.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// Use an existing `reqwest` client.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        tracing::debug!(endpoint = %path, "GET");
        let resp = self.client.get(self.url(path)).send().await?;
        decode_json(path, resp).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(endpoint = %path, "POST");
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        decode_json(path, resp).await
    }
}

/// Reject non-2xx statuses, then decode the body as JSON.
async fn decode_json<T: DeserializeOwned>(path: &str, resp: Response) -> Result<T, BackendError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(BackendError::Status {
            endpoint: path.to_string(),
            status: status.as_u16(),
        });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode {
        endpoint: path.to_string(),
        message: e.to_string(),
    })
}

fn require_operational(domain: Domain) -> Result<(), BackendError> {
    match domain {
        Domain::Hospital | Domain::Warehouse => Ok(()),
        Domain::Dashboard => Err(BackendError::UnsupportedDomain(domain)),
    }
}

#[async_trait]
impl DashboardBackend for HttpBackend {
    async fn domain_stats(&self, domain: Domain) -> Result<DomainStats, BackendError> {
        require_operational(domain)?;
        self.get_json(&endpoints::stats(domain)).await
    }

    async fn optimize(&self, domain: Domain) -> Result<OptimizeResponse, BackendError> {
        require_operational(domain)?;
        let body = OptimizeRequest {
            kind: domain.as_str(),
        };
        let resp: OptimizeResponse = self.post_json(endpoints::OPTIMIZE, &body).await?;
        if resp.is_failure() {
            return Err(BackendError::Rejected {
                endpoint: endpoints::OPTIMIZE.to_string(),
                status: resp.status.unwrap_or_default(),
            });
        }
        Ok(resp)
    }

    async fn system_metrics(&self) -> Result<SystemMetrics, BackendError> {
        self.get_json(endpoints::METRICS).await
    }

    async fn chat(&self, prompt: &str, context: Domain) -> Result<ChatReply, BackendError> {
        let body = ChatRequest {
            prompt,
            context: context.as_str(),
        };
        self.post_json(endpoints::CHAT, &body).await
    }

    async fn synthesize(&self, text: &str) -> Result<SynthesisOutcome, BackendError> {
        let path = endpoints::SPEAK;
        tracing::debug!(endpoint = %path, chars = text.len(), "POST");
        let resp = self
            .client
            .post(self.url(path))
            .json(&SpeakRequest { text })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = resp.bytes().await?;

        if content_type.starts_with("audio/") && !bytes.is_empty() {
            return Ok(SynthesisOutcome::Audio {
                content_type,
                bytes: bytes.to_vec(),
            });
        }

        let status = serde_json::from_slice::<serde_json::Value>(&bytes)
            .ok()
            .and_then(|v| v.get("status").and_then(|s| s.as_str()).map(str::to_string));
        Ok(SynthesisOutcome::NotAudio { status })
    }
}
