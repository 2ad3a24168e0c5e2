use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Cancels the pipeline when the process receives an interrupt. Also
/// returns once the token is cancelled from elsewhere, for example when the
/// event source runs dry.
///
/// Signal delivery has limited success on detached Windows processes.
pub async fn watch_for_shutdown(cancellation: CancellationToken) {
    select! {
        _ = cancellation.cancelled() => (),
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Unable to listen for shutdown signals {e:?}");
            }
            debug!("Interrupt received, winding down");
            cancellation.cancel();
        },
    };
}
