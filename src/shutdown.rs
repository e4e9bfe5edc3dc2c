use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

/// Run-scoped cancellation handle.
///
/// The signal is a level, not an event: once triggered it stays triggered,
/// so a receiver subscribed afterwards still observes it.
#[derive(Debug, Clone)]
pub struct ShutdownSender {
    tx: Arc<watch::Sender<bool>>,
}

/// Waits for a [`ShutdownSender`] to trigger.
#[derive(Debug, Clone)]
pub struct ShutdownReceiver {
    rx: watch::Receiver<bool>,
}

#[must_use]
pub fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    let (tx, rx) = watch::channel(false);
    (
        ShutdownSender { tx: Arc::new(tx) },
        ShutdownReceiver { rx },
    )
}

impl ShutdownSender {
    /// Marks the run as cancelled. Repeated calls are no-ops.
    pub fn trigger(&self) {
        let first = self.tx.send_if_modified(|fired| {
            let changed = !*fired;
            *fired = true;
            changed
        });
        if first {
            debug!("shutdown triggered");
        }
    }

    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> ShutdownReceiver {
        ShutdownReceiver {
            rx: self.tx.subscribe(),
        }
    }
}

impl ShutdownReceiver {
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves immediately when shutdown already fired, otherwise once it
    /// does. Dropping every sender also resolves it.
    pub async fn triggered(&mut self) {
        let closed = self.rx.wait_for(|fired| *fired).await.is_err();
        if closed {
            debug!("shutdown sender dropped");
        }
    }
}
