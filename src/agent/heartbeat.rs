use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::event::ActivityEvent;

/// Client identifier reported with every heartbeat.
pub const PLUGIN_IDENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// The only entity kind the agent reports. Non-file storage never reaches
/// the pipeline.
const ENTITY_KIND: &str = "file";

/// The record posted to the heartbeat ingestion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heartbeat {
    /// Capture time in fractional seconds since the epoch.
    #[serde(with = "ts_fractional")]
    pub time: DateTime<Utc>,
    pub entity: Arc<str>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub project: Option<Arc<str>>,
    pub language: Option<Arc<str>>,
    pub is_write: bool,
    pub lines: u32,
    pub plugin: &'static str,
}

impl From<&ActivityEvent> for Heartbeat {
    fn from(event: &ActivityEvent) -> Self {
        Heartbeat {
            time: event.timestamp,
            entity: event.path.clone(),
            kind: ENTITY_KIND,
            project: event.project.clone(),
            language: event.language.clone(),
            is_write: event.kind.is_write(),
            lines: event.lines,
            plugin: PLUGIN_IDENT,
        }
    }
}

mod ts_fractional {
    use chrono::{DateTime, Utc};
    use serde::{self, Serializer};

    pub fn serialize<S>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(time.timestamp_millis() as f64 / 1000.0)
    }
}
