mod config;
mod worker;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Request;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::{
    args::PositiveU64,
    error::AppResult,
    metrics::{Aggregate, Summary},
    shutdown::ShutdownSender,
};

use super::rate::{throttle, throttle_delay};
use super::workload::{RequestTemplate, produce};
use config::{build_http_client, resolve_concurrency};

pub use worker::{Dispatch, HttpSender, SendAttempt, dispatch};

/// Knobs of a [`Client`]. Zero or `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Worker count; defaults to the host's available parallelism.
    pub concurrency: Option<usize>,
    /// Target requests per second across all workers; unthrottled when unset.
    pub rate: Option<u64>,
    /// Bound on a single attempt, including reading the body.
    pub request_timeout: Option<Duration>,
    /// Drop in-flight attempts on shutdown instead of letting them finish.
    pub abort_in_flight: bool,
}

/// Runs load against one request template.
#[derive(Debug, Clone, Default)]
pub struct Client {
    config: ClientConfig,
}

impl Client {
    #[must_use]
    pub const fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn concurrency(&self) -> usize {
        resolve_concurrency(self.config.concurrency)
    }

    /// Delay between attempts leaving the producer, if throttled.
    #[must_use]
    pub fn throttle_delay(&self) -> Option<Duration> {
        throttle_delay(self.config.rate.unwrap_or(0), self.concurrency())
    }

    /// Sends `attempts` GET requests built from `template` and returns the
    /// finalized summary.
    ///
    /// Triggering `shutdown_tx`, even before this call, ends the run early;
    /// the summary then covers the attempts that completed. The connection pool is created for this run
    /// and released once every worker has finished.
    ///
    /// # Errors
    ///
    /// Returns an error only when the HTTP client cannot be built.
    pub async fn run(
        &self,
        template: &RequestTemplate,
        attempts: PositiveU64,
        shutdown_tx: &ShutdownSender,
    ) -> AppResult<Summary> {
        let concurrency = self.concurrency();
        let http = build_http_client(concurrency, self.config.request_timeout)?;
        let sender = Arc::new(HttpSender::new(http));

        let summary = self
            .run_with_sender(template, attempts, Arc::clone(&sender), shutdown_tx)
            .await;

        drop(sender);
        debug!("Released connection pool.");
        Ok(summary)
    }

    /// Same pipeline as [`Client::run`] over any [`SendAttempt`] transport.
    pub async fn run_with_sender<S>(
        &self,
        template: &RequestTemplate,
        attempts: PositiveU64,
        sender: Arc<S>,
        shutdown_tx: &ShutdownSender,
    ) -> Summary
    where
        S: SendAttempt<Request>,
    {
        let concurrency = self.concurrency();
        let delay = self.throttle_delay();
        info!(
            url = %template.url(),
            attempts = attempts.get(),
            concurrency,
            ?delay,
            "Starting run."
        );

        let start = Instant::now();
        let factory_template = template.clone();
        let mut requests = produce(
            attempts.get(),
            move || factory_template.instantiate(),
            shutdown_tx,
        );
        if let Some(delay) = delay {
            requests = throttle(requests, delay, shutdown_tx);
        }

        let mut dispatch = dispatch(
            requests,
            concurrency,
            sender,
            self.config.abort_in_flight,
            shutdown_tx,
        );

        let mut aggregate = Aggregate::new();
        while let Some(outcome) = dispatch.next().await {
            aggregate.merge(&outcome);
        }
        dispatch.finish().await;

        aggregate.finalize(start.elapsed())
    }
}
