use super::device_loop::DeviceLoop;
use super::types::ShutdownReason;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::{oneshot, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

impl DeviceLoop {
    /// Run the device loop until SIGINT or SIGTERM arrives
    pub async fn run_until_signal(&mut self) -> ShutdownReason {
        let cancel = CancellationToken::new();
        let (sender, receiver) = oneshot::channel();
        setup_signal_handlers(sender);

        let watcher = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let reason = receiver.await.ok();
                cancel.cancel();
                reason
            })
        };

        self.run(cancel).await;

        let reason = watcher
            .await
            .ok()
            .flatten()
            .unwrap_or(ShutdownReason::Cancelled);
        info!("Shutdown complete: {:?}", reason);
        reason
    }

    /// Run exactly one cycle, then clear the indicators
    pub async fn run_once(&mut self) -> ShutdownReason {
        let outcome = self.run_cycle().await;
        info!(
            "Single cycle finished in state {} after {:?}",
            outcome.state, outcome.elapsed
        );
        self.shutdown();
        ShutdownReason::SingleCycle
    }
}

/// Forward the first SIGINT or SIGTERM to `sender`
fn setup_signal_handlers(sender: oneshot::Sender<ShutdownReason>) {
    let sender = Arc::new(Mutex::new(Some(sender)));

    #[cfg(unix)]
    {
        let sender = Arc::clone(&sender);
        tokio::spawn(async move {
            let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(stream) => stream,
                Err(e) => {
                    warn!("Failed to register SIGTERM handler: {}", e);
                    return;
                }
            };
            if sigterm.recv().await.is_some() {
                info!("Received SIGTERM signal");
                if let Some(sender) = sender.lock().await.take() {
                    let _ = sender.send(ShutdownReason::Signal("SIGTERM".to_string()));
                }
            }
        });
    }

    tokio::spawn(async move {
        if let Ok(()) = signal::ctrl_c().await {
            info!("Received SIGINT signal (Ctrl+C)");
            if let Some(sender) = sender.lock().await.take() {
                let _ = sender.send(ShutdownReason::Signal("SIGINT".to_string()));
            }
        }
    });
}
