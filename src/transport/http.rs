use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::{agent::heartbeat::Heartbeat, config::ApiKey};

use super::Transport;

/// Production ingestion endpoint.
pub const DEFAULT_API_URL: &str = "https://wakatime.com/api/v1/users/current/heartbeats";

/// Posts heartbeats over HTTPS with the API key passed as a query
/// credential. The response body is never read.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    api_key: ApiKey,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, api_key: ApiKey) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, heartbeat: Heartbeat) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .query(&[("apikey", self.api_key.expose())])
            .json(&heartbeat)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Heartbeat endpoint answered {status}"));
        }
        debug!("Delivered heartbeat for {:?}", heartbeat.entity);
        Ok(())
    }
}
