use tokio::sync::mpsc;
use tracing::debug;

use crate::shutdown::ShutdownSender;

use super::STAGE_BUFFER;

/// Emits `count` values from `factory` into a fresh channel.
///
/// The factory runs once per emitted value and only after downstream has
/// room for it. A shutdown signal (or every shutdown sender being dropped)
/// stops production early and closes the channel; so does the receiver
/// going away.
pub fn produce<T, F>(
    count: u64,
    mut factory: F,
    shutdown_tx: &ShutdownSender,
) -> mpsc::Receiver<T>
where
    T: Send + 'static,
    F: FnMut() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel(STAGE_BUFFER);
    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::spawn(async move {
        let mut emitted: u64 = 0;
        while emitted < count {
            let permit = tokio::select! {
                biased;
                () = shutdown_rx.triggered() => break,
                permit = tx.reserve() => permit,
            };
            let Ok(permit) = permit else {
                break;
            };
            permit.send(factory());
            emitted = emitted.saturating_add(1);
        }
        debug!(emitted, count, "producer finished");
    });

    rx
}
