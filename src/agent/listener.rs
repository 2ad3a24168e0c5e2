use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info_span, Instrument};

use crate::{editor_api::EventSource, utils::clock::Clock};

use super::event::ActivityEvent;

/// Bridges a host event source and the processing channel, stamping each
/// notification with its capture time.
pub struct EventListenerModule {
    next: mpsc::Sender<ActivityEvent>,
    source: Box<dyn EventSource>,
    shutdown: CancellationToken,
    time_provider: Box<dyn Clock>,
}

impl EventListenerModule {
    pub fn new(
        next: mpsc::Sender<ActivityEvent>,
        source: Box<dyn EventSource>,
        shutdown: CancellationToken,
        time_provider: Box<dyn Clock>,
    ) -> Self {
        Self {
            next,
            source,
            shutdown,
            time_provider,
        }
    }

    /// Executes the listener event loop. Returns when the source runs dry
    /// or shutdown is requested. Any exit cancels the token so the rest of
    /// the pipeline winds down with it.
    pub async fn run(mut self) -> Result<()> {
        let _stop_pipeline = self.shutdown.clone().drop_guard();
        loop {
            let next = tokio::select! {
                _ = self.shutdown.cancelled() => return Ok(()),
                next = self.source.next_event() => next,
            };

            match next {
                Ok(Some(raw)) => {
                    let event = ActivityEvent {
                        path: raw.path,
                        project: raw.project,
                        language: raw.language,
                        kind: raw.kind,
                        lines: raw.lines,
                        timestamp: self.time_provider.time(),
                    };
                    let span = info_span!("Forwarding activity event");
                    debug!("Sending event {:?}", event);
                    self.next
                        .send(event)
                        .instrument(span)
                        .await
                        .inspect_err(|e| error!("Unexpected error during sending {e:?}"))?;
                }
                Ok(None) => {
                    debug!("Event source closed, stopping listener");
                    return Ok(());
                }
                Err(e) => {
                    error!("Encountered an error while reading events {:?}", e);
                    return Err(e);
                }
            }
        }
    }
}
