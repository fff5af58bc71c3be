//! Cascading shutdown coordination (spec.md §5: "Shutdown cascades: Worker
//! Host → Station Runtime → ATG + Heartbeat + In-flight requests; each
//! level waits for its children with a bounded deadline (default 60s)
//! before forcing termination.").

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{info, warn};

/// A shutdown signal that can be cloned and shared across tasks at one level.
#[derive(Clone)]
pub struct ShutdownSignal {
    sender: broadcast::Sender<()>,
    triggered: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self {
            sender,
            triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    pub fn trigger(&self) {
        if !self.triggered.swap(true, Ordering::SeqCst) {
            let _ = self.sender.send(());
        }
    }

    pub fn notified(&self) -> ShutdownNotified {
        ShutdownNotified {
            receiver: self.sender.subscribe(),
            triggered: self.triggered.clone(),
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// A future that resolves once shutdown has been triggered, even if it was
/// triggered before this was created.
pub struct ShutdownNotified {
    receiver: broadcast::Receiver<()>,
    triggered: Arc<AtomicBool>,
}

impl ShutdownNotified {
    pub async fn wait(mut self) {
        if self.triggered.load(Ordering::SeqCst) {
            return;
        }
        let _ = self.receiver.recv().await;
    }
}

/// Listens for SIGTERM/SIGINT (spec.md §6: "termination is graceful on
/// SIGINT/SIGTERM").
pub async fn listen_for_shutdown_signals(shutdown: ShutdownSignal) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => info!("received SIGTERM"),
            _ = sigint.recv() => info!("received SIGINT"),
        }
        shutdown.trigger();
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
        info!("received Ctrl+C");
        shutdown.trigger();
    }
}

/// Waits for a child task to finish within a bounded deadline, then forces
/// termination by simply returning — used at every level of the shutdown
/// cascade (Worker Host → Station Runtime → ATG/Heartbeat/in-flight).
pub async fn wait_with_deadline<F>(label: &str, timeout_secs: u64, fut: F)
where
    F: std::future::Future<Output = ()>,
{
    match tokio::time::timeout(std::time::Duration::from_secs(timeout_secs), fut).await {
        Ok(()) => info!(label, "shut down cleanly"),
        Err(_) => warn!(label, timeout_secs, "shutdown deadline exceeded, forcing termination"),
    }
}
