//! Outbound boundary towards the heartbeat ingestion service.
//! [http::HttpTransport] is the real thing; tests mock the trait.

pub mod http;

use anyhow::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::agent::heartbeat::Heartbeat;

/// One-way outbound channel for heartbeats. The pipeline never waits on the
/// outcome; implementations report failures through their own logging.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, heartbeat: Heartbeat) -> Result<()>;
}
