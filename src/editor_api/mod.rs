//! Contains logic for receiving activity notifications from host editors.
//! [stdin::StdinEventSource] is the shipped implementation; any host can
//! plug in by implementing [EventSource].

pub mod stdin;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Deserialize;

use crate::agent::event::ActivityKind;

/// An activity notification the way the host hands it over, before the
/// agent stamps it with a capture time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawActivityEvent {
    pub kind: ActivityKind,
    pub path: Arc<str>,
    #[serde(default)]
    pub project: Option<Arc<str>>,
    #[serde(default)]
    pub language: Option<Arc<str>>,
    #[serde(default)]
    pub lines: u32,
}

/// Contract host-editor integrations must implement to feed the agent.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EventSource: Send {
    /// Waits for the next activity notification. `None` means the host
    /// closed the stream and the agent should wind down.
    async fn next_event(&mut self) -> Result<Option<RawActivityEvent>>;
}
