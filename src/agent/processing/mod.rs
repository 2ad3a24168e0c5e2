use anyhow::Result;
use module::EventSink;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, error, trace};

use super::event::ActivityEvent;

pub mod module;
pub mod sender;

/// Drains activity events from the channel and feeds them to a sink. Runs
/// until the producing side closes the channel, then finalizes the sink.
pub struct ProcessingModule<Sink> {
    receiver: Receiver<ActivityEvent>,
    sink: Sink,
}

impl<S: EventSink> ProcessingModule<S> {
    pub fn new(receiver: Receiver<ActivityEvent>, sink: S) -> Self {
        Self { receiver, sink }
    }

    pub async fn run(mut self) -> Result<()> {
        while let Some(event) = self.receiver.recv().await {
            debug!("Processing event {:?}", event);
            match self.sink.process_next(event).await {
                Ok(_) => trace!("Event handled"),
                Err(e) => error!("Error processing activity event: {e:?}"),
            }
        }

        let result = self.sink.finalize().await;
        self.receiver.close();
        result
    }
}
