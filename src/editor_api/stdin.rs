use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::warn;

use super::{EventSource, RawActivityEvent};

/// Reads newline-delimited JSON activity events from the agent's stdin.
/// The host editor spawns the agent and writes one object per line:
///
/// ```json
/// {"kind":"change","path":"src/main.rs","project":"codepulse","language":"rust","lines":120}
/// ```
pub struct StdinEventSource {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinEventSource {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinEventSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes a single line. Unusable lines come back as `None` so the stream
/// keeps going.
fn decode_line(line: &str) -> Option<RawActivityEvent> {
    if line.trim().is_empty() {
        return None;
    }
    let event = match serde_json::from_str::<RawActivityEvent>(line) {
        Ok(v) => v,
        Err(e) => {
            warn!("Discarding malformed activity line {line:?}: {e}");
            return None;
        }
    };
    if event.path.is_empty() {
        warn!("Discarding activity event without a file path");
        return None;
    }
    Some(event)
}

#[async_trait]
impl EventSource for StdinEventSource {
    async fn next_event(&mut self) -> Result<Option<RawActivityEvent>> {
        while let Some(line) = self.lines.next_line().await? {
            if let Some(event) = decode_line(&line) {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }
}
