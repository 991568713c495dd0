use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cancels `cancelation` once ctrl-c is received. If signals can't be listened to the token is
/// left alone and other ways of stopping still work.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("Received ctrl-c");
            cancelation.cancel();
        }
        Err(e) => warn!("Can't listen for ctrl-c {e}"),
    }
}
