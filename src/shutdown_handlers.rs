use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::time::sleep;

use crate::shutdown::ShutdownSender;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Records which trigger ended the run early.
#[derive(Debug, Clone, Default)]
pub(crate) struct StopReason {
    interrupted: Arc<AtomicBool>,
    deadline: Arc<AtomicBool>,
}

impl StopReason {
    pub(crate) fn interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Relaxed)
    }

    pub(crate) fn deadline_reached(&self) -> bool {
        self.deadline.load(Ordering::Relaxed)
    }
}

pub(crate) fn setup_signal_shutdown_handler(
    shutdown_tx: &ShutdownSender,
    reason: &StopReason,
) -> tokio::task::JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    let mut shutdown_rx = shutdown_tx.subscribe();
    let interrupted = reason.interrupted.clone();
    tokio::spawn(async move {
        #[cfg(unix)]
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(signal) => Some(signal),
            Err(err) => {
                eprintln!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };

        #[cfg(unix)]
        {
            tokio::select! {
                () = shutdown_rx.triggered() => {}
                _ = tokio::signal::ctrl_c() => {
                    interrupted.store(true, Ordering::Relaxed);
                    shutdown_tx.trigger();
                }
                () = async {
                    if let Some(signal) = term_signal.as_mut() {
                        signal.recv().await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {
                    interrupted.store(true, Ordering::Relaxed);
                    shutdown_tx.trigger();
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                () = shutdown_rx.triggered() => {}
                _ = tokio::signal::ctrl_c() => {
                    interrupted.store(true, Ordering::Relaxed);
                    shutdown_tx.trigger();
                }
            }
        }
    })
}

/// Fires the shutdown channel once `deadline` has elapsed.
pub(crate) fn setup_deadline_handler(
    shutdown_tx: &ShutdownSender,
    deadline: Duration,
    reason: &StopReason,
) -> tokio::task::JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    let mut shutdown_rx = shutdown_tx.subscribe();
    let reached = reason.deadline.clone();
    tokio::spawn(async move {
        tokio::select! {
            () = shutdown_rx.triggered() => {}
            () = sleep(deadline) => {
                reached.store(true, Ordering::Relaxed);
                shutdown_tx.trigger();
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shutdown::shutdown_channel;
    use std::future::Future;

    const SIGNAL_HANDLER_SETTLE: Duration = Duration::from_millis(10);
    const SHUTDOWN_HANDLER_TIMEOUT: Duration = Duration::from_secs(1);

    fn run_async_test<F>(future: F) -> Result<(), String>
    where
        F: Future<Output = Result<(), String>>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| format!("Failed to build runtime: {}", err))?;
        runtime.block_on(future)
    }

    #[test]
    fn signal_handler_exits_on_shutdown() -> Result<(), String> {
        run_async_test(async {
            let (shutdown_tx, _) = shutdown_channel();
            let reason = StopReason::default();
            let handle = setup_signal_shutdown_handler(&shutdown_tx, &reason);

            tokio::time::sleep(SIGNAL_HANDLER_SETTLE).await;
            shutdown_tx.trigger();

            tokio::time::timeout(SHUTDOWN_HANDLER_TIMEOUT, handle)
                .await
                .map_err(|err| format!("Timed out waiting for shutdown handler: {}", err))?
                .map_err(|err| format!("Shutdown task join error: {}", err))?;
            if reason.interrupted() {
                return Err("Shutdown must not look like a signal".to_owned());
            }
            Ok(())
        })
    }

    #[test]
    fn handlers_exit_when_shutdown_fired_before_setup() -> Result<(), String> {
        run_async_test(async {
            let (shutdown_tx, _) = shutdown_channel();
            shutdown_tx.trigger();
            let reason = StopReason::default();
            let signal_handle = setup_signal_shutdown_handler(&shutdown_tx, &reason);
            let deadline_handle =
                setup_deadline_handler(&shutdown_tx, Duration::from_secs(60), &reason);

            tokio::time::timeout(SHUTDOWN_HANDLER_TIMEOUT, signal_handle)
                .await
                .map_err(|err| format!("Signal handler missed earlier shutdown: {}", err))?
                .map_err(|err| format!("Signal handler join error: {}", err))?;
            tokio::time::timeout(SHUTDOWN_HANDLER_TIMEOUT, deadline_handle)
                .await
                .map_err(|err| format!("Deadline handler missed earlier shutdown: {}", err))?
                .map_err(|err| format!("Deadline handler join error: {}", err))?;
            if reason.interrupted() || reason.deadline_reached() {
                return Err("No trigger should be recorded".to_owned());
            }
            Ok(())
        })
    }

    #[test]
    fn deadline_handler_fires_shutdown() -> Result<(), String> {
        run_async_test(async {
            let (shutdown_tx, mut shutdown_rx) = shutdown_channel();
            let reason = StopReason::default();
            let handle =
                setup_deadline_handler(&shutdown_tx, Duration::from_millis(20), &reason);

            tokio::time::timeout(SHUTDOWN_HANDLER_TIMEOUT, shutdown_rx.triggered())
                .await
                .map_err(|err| format!("Deadline never fired: {}", err))?;
            handle
                .await
                .map_err(|err| format!("Deadline join error: {}", err))?;
            if !reason.deadline_reached() {
                return Err("Expected deadline flag".to_owned());
            }
            Ok(())
        })
    }
}
