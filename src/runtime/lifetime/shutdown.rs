use tokio::signal;
use tracing::{info, warn};

/// Resolve on Ctrl+C (or SIGTERM on unix).
///
/// The relay keeps no state, so there is nothing to flush; in-flight
/// requests are drained by actix's own graceful stop.
pub async fn listen_for_shutdown() {
    #[cfg(unix)]
    {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                wait_ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = wait_ctrl_c() => {}
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    wait_ctrl_c().await;
}

async fn wait_ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, shutting down..."),
        Err(e) => warn!(
            "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
            e
        ),
    }
}
