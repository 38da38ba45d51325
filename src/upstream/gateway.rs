use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::error::{Error, Result};

/// Authenticated JSON fetches against the upstream API.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// GET `url` with `Authorization: Bearer <token>` and `query` appended.
    ///
    /// Non-2xx responses fail with [`Error::UpstreamHttp`], bodies that are not
    /// JSON fail with [`Error::MalformedResponse`].
    async fn fetch_json(&self, url: &str, token: &str, query: &[(&str, &str)]) -> Result<Value>;
}

/// Production gateway backed by a shared reqwest client
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
}

impl HttpGateway {
    pub fn from_config(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .context("failed to build HTTP client for the upstream API")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn fetch_json(&self, url: &str, token: &str, query: &[(&str, &str)]) -> Result<Value> {
        let mut request = self.client.get(url).bearer_auth(token);
        if !query.is_empty() {
            request = request.query(query);
        }

        debug!(url, "fetching from upstream");
        let response = request.send().await.map_err(|source| Error::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamHttp {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await.map_err(|source| Error::Transport {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|e| Error::MalformedResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
