//! Graceful shutdown handling.
//!
//! Signals are turned into a single shutdown notification that the HTTP
//! server and background tasks listen for.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Coordinates shutdown between the server and its background tasks.
///
/// Both flags are `watch` channels, so a listener that subscribes after
/// the fact still observes the current value.
#[derive(Debug, Clone)]
pub struct ShutdownController {
    shutdown: Arc<watch::Sender<bool>>,
    completion: Arc<watch::Sender<bool>>,
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownController {
    /// Creates a new shutdown controller.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(watch::Sender::new(false)),
            completion: Arc::new(watch::Sender::new(false)),
        }
    }

    /// Initiates shutdown. Only the first call is logged.
    pub fn initiate_shutdown(&self) {
        let first = self.shutdown.send_if_modified(|initiated| {
            !std::mem::replace(initiated, true)
        });
        if first {
            info!("Shutdown initiated");
        }
    }

    /// Returns whether shutdown has been initiated.
    #[must_use]
    pub fn is_shutdown_initiated(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Completes once shutdown has been initiated.
    pub async fn wait_for_shutdown(&self) {
        let mut rx = self.shutdown.subscribe();
        let _ = rx.wait_for(|initiated| *initiated).await;
    }

    /// Marks shutdown as complete.
    pub fn mark_complete(&self) {
        self.completion.send_replace(true);
    }

    /// Waits for [`mark_complete`](Self::mark_complete).
    ///
    /// Returns `false` if `timeout` elapsed first.
    pub async fn wait_for_completion(&self, timeout: Duration) -> bool {
        let mut rx = self.completion.subscribe();
        if let Ok(done) = tokio::time::timeout(timeout, rx.wait_for(|done| *done)).await {
            done.is_ok()
        } else {
            warn!(?timeout, "Shutdown completion timed out");
            false
        }
    }
}

/// Waits for SIGINT or SIGTERM (Ctrl+C elsewhere) and initiates shutdown.
///
/// If the handlers cannot be installed the error is logged and the task
/// returns; the server then only stops through
/// [`ShutdownController::initiate_shutdown`].
pub async fn setup_signal_handlers(controller: ShutdownController) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let (mut sigint, mut sigterm) =
            match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
                (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
                (Err(e), _) | (_, Err(e)) => {
                    error!(error = %e, "Failed to install signal handlers");
                    return;
                }
            };

        tokio::select! {
            _ = sigint.recv() => info!("Received SIGINT"),
            _ = sigterm.recv() => info!("Received SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            return;
        }
        info!("Received Ctrl+C");
    }

    controller.initiate_shutdown();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_initiation_is_idempotent() {
        let controller = ShutdownController::new();
        assert!(!controller.is_shutdown_initiated());

        controller.initiate_shutdown();
        controller.initiate_shutdown();
        assert!(controller.is_shutdown_initiated());
    }

    #[tokio::test]
    async fn test_waiters_are_woken() {
        let controller = ShutdownController::new();

        let waiter = {
            let ctrl = controller.clone();
            tokio::spawn(async move { ctrl.wait_for_shutdown().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        controller.initiate_shutdown();

        let result = tokio::time::timeout(Duration::from_secs(1), waiter).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_wait_after_initiation_returns() {
        let controller = ShutdownController::new();
        controller.initiate_shutdown();

        let waited =
            tokio::time::timeout(Duration::from_millis(100), controller.wait_for_shutdown()).await;
        assert!(waited.is_ok());
    }

    #[tokio::test]
    async fn test_shutdown_completion() {
        let controller = ShutdownController::new();
        controller.initiate_shutdown();
        controller.mark_complete();

        assert!(
            controller
                .wait_for_completion(Duration::from_millis(100))
                .await
        );
    }

    #[tokio::test]
    async fn test_shutdown_completion_timeout() {
        let controller = ShutdownController::new();
        controller.initiate_shutdown();

        assert!(
            !controller
                .wait_for_completion(Duration::from_millis(50))
                .await
        );
    }
}
