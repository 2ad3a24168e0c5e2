use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, error, trace};

use crate::{
    agent::{
        event::ActivityEvent,
        gate::{GateState, HeartbeatGate},
        heartbeat::Heartbeat,
    },
    transport::Transport,
};

use super::module::EventSink;

/// Terminal stage of the pipeline: applies the heartbeat gate and hands
/// approved events to the transport. The send is dispatched as a detached
/// task and its outcome never reaches the gate.
pub struct HeartbeatSender {
    gate: HeartbeatGate,
    state: GateState,
    /// `None` when no api key is configured. The gate then never fires.
    transport: Option<Arc<dyn Transport>>,
}

impl HeartbeatSender {
    pub fn new(gate: HeartbeatGate, transport: Option<Arc<dyn Transport>>) -> Self {
        Self {
            gate,
            state: GateState::default(),
            transport,
        }
    }
}

impl EventSink for HeartbeatSender {
    async fn process_next(&mut self, event: ActivityEvent) -> Result<()> {
        let Some(transport) = self.transport.as_ref() else {
            trace!("No api key configured, ignoring activity on {:?}", event.path);
            return Ok(());
        };

        let Some(reason) = self.gate.decide(&event, &self.state) else {
            trace!("Suppressed activity on {:?}", event.path);
            return Ok(());
        };

        self.gate.commit(&event, &mut self.state);
        debug!("Emitting heartbeat for {:?} ({reason:?})", event.path);

        let heartbeat = Heartbeat::from(&event);
        let transport = Arc::clone(transport);
        tokio::spawn(async move {
            if let Err(e) = transport.send(heartbeat).await {
                error!("Failed to deliver heartbeat: {e:?}");
            }
        });

        Ok(())
    }

    async fn finalize(&mut self) -> Result<()> {
        Ok(())
    }
}
