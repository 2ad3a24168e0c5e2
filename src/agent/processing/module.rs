use anyhow::Result;

use crate::agent::event::ActivityEvent;

/// Represents a consumer on the processing side of the channel. Abstracts
/// over delivery targets: the live heartbeat sender, or test doubles.
pub trait EventSink {
    fn process_next(&mut self, event: ActivityEvent) -> impl std::future::Future<Output = Result<()>>;

    fn finalize(&mut self) -> impl std::future::Future<Output = Result<()>>;
}
