use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Request;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error};

use crate::{
    metrics::{AttemptError, AttemptErrorKind, RequestOutcome},
    shutdown::ShutdownSender,
};

use super::super::workload::send;

/// Performs one attempt. Implementations must fold every failure into the
/// returned outcome instead of panicking.
#[async_trait]
pub trait SendAttempt<T: Send + 'static>: Send + Sync + 'static {
    async fn send(&self, item: T) -> RequestOutcome;
}

/// Sends requests over a shared, pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpSender {
    client: reqwest::Client,
}

impl HttpSender {
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SendAttempt<Request> for HttpSender {
    async fn send(&self, item: Request) -> RequestOutcome {
        send(&self.client, item).await
    }
}

/// Fan-in side of a running dispatch.
pub struct Dispatch {
    results: mpsc::Receiver<RequestOutcome>,
    workers: JoinSet<()>,
}

impl Dispatch {
    /// Next completed outcome, in completion order. `None` once every worker
    /// has exited.
    pub async fn next(&mut self) -> Option<RequestOutcome> {
        self.results.recv().await
    }

    /// Waits for every worker task to end. A panicking worker is logged and
    /// does not fail the run.
    pub async fn finish(mut self) {
        self.results.close();
        while let Some(joined) = self.workers.join_next().await {
            if let Err(err) = joined {
                error!("Dispatch worker ended abnormally: {}", err);
            }
        }
    }
}

/// Starts `workers` tasks that pull from `input`, call `sender`, and publish
/// each outcome as soon as it completes.
///
/// Idle workers leave when `input` closes or shutdown fires. With
/// `abort_in_flight`, shutdown also drops pending sends and records them as
/// cancelled; otherwise they run to completion under their own timeout.
pub fn dispatch<T, S>(
    input: mpsc::Receiver<T>,
    workers: usize,
    sender: Arc<S>,
    abort_in_flight: bool,
    shutdown_tx: &ShutdownSender,
) -> Dispatch
where
    T: Send + 'static,
    S: SendAttempt<T>,
{
    let workers = workers.max(1);
    let (results_tx, results_rx) = mpsc::channel(workers);
    let input = Arc::new(Mutex::new(input));
    let mut set = JoinSet::new();

    for worker_id in 0..workers {
        let input = Arc::clone(&input);
        let results_tx = results_tx.clone();
        let sender = Arc::clone(&sender);
        let mut shutdown_rx = shutdown_tx.subscribe();

        set.spawn(async move {
            let mut completed: u64 = 0;
            loop {
                let next = tokio::select! {
                    biased;
                    () = shutdown_rx.triggered() => None,
                    item = next_item(&input) => item,
                };
                let Some(item) = next else {
                    break;
                };

                let mut cancelled = false;
                let outcome = if abort_in_flight {
                    let start = Instant::now();
                    tokio::select! {
                        biased;
                        () = shutdown_rx.triggered() => {
                            cancelled = true;
                            RequestOutcome::failed(
                                AttemptError::new(
                                    AttemptErrorKind::Cancelled,
                                    "run cancelled while the request was in flight",
                                ),
                                start.elapsed(),
                            )
                        }
                        outcome = sender.send(item) => outcome,
                    }
                } else {
                    sender.send(item).await
                };

                if results_tx.send(outcome).await.is_err() {
                    break;
                }
                completed = completed.saturating_add(1);
                if cancelled {
                    break;
                }
            }
            debug!(worker_id, completed, "worker exiting");
        });
    }
    drop(results_tx);

    Dispatch {
        results: results_rx,
        workers: set,
    }
}

async fn next_item<T>(input: &Mutex<mpsc::Receiver<T>>) -> Option<T> {
    let mut input = input.lock().await;
    input.recv().await
}
