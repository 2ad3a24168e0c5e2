use std::sync::Arc;

use anyhow::Result;
use event::ActivityEvent;
use gate::HeartbeatGate;
use listener::EventListenerModule;
use processing::{sender::HeartbeatSender, ProcessingModule};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::{
    config::AgentConfig,
    editor_api::{stdin::StdinEventSource, EventSource},
    transport::{http::HttpTransport, Transport},
    utils::clock::{Clock, DefaultClock},
};

pub mod event;
pub mod gate;
pub mod heartbeat;
pub mod listener;
pub mod processing;
pub mod shutdown;

const EVENT_CHANNEL_CAPACITY: usize = 10;

/// Represents the starting point for the agent pipeline.
pub async fn start_agent(config: AgentConfig) -> Result<()> {
    let AgentConfig { api_key, api_url, .. } = config;

    let transport: Option<Arc<dyn Transport>> = match api_key {
        Some(key) => Some(Arc::new(HttpTransport::new(api_url, key))),
        None => {
            warn!("No api key configured, activity will be observed but never reported");
            None
        }
    };

    let (sender, receiver) = mpsc::channel::<ActivityEvent>(EVENT_CHANNEL_CAPACITY);
    let shutdown_token = CancellationToken::new();

    let listener = create_listener(sender, StdinEventSource::new(), &shutdown_token, DefaultClock);
    let processor = create_processor(receiver, transport);

    let (_, listener_result, processing_result) = tokio::join!(
        shutdown::watch_for_shutdown(shutdown_token.clone()),
        listener.run(),
        processor.run(),
    );

    if let Err(listener_result) = listener_result {
        error!("Listener module got an error {:?}", listener_result);
    }

    if let Err(processing_result) = processing_result {
        error!("Processing module got an error {:?}", processing_result);
    }

    Ok(())
}

fn create_listener(
    sender: mpsc::Sender<ActivityEvent>,
    source: impl EventSource + 'static,
    shutdown_token: &CancellationToken,
    clock: impl Clock,
) -> EventListenerModule {
    EventListenerModule::new(
        sender,
        Box::new(source),
        shutdown_token.clone(),
        Box::new(clock),
    )
}

fn create_processor(
    receiver: mpsc::Receiver<ActivityEvent>,
    transport: Option<Arc<dyn Transport>>,
) -> ProcessingModule<HeartbeatSender> {
    let sender = HeartbeatSender::new(HeartbeatGate::with_default_cadence(), transport);
    ProcessingModule::new(receiver, sender)
}
