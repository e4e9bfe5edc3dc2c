use std::num::NonZeroUsize;
use std::time::Duration;

use reqwest::Client;
use tracing::error;

use crate::error::{AppError, AppResult, HttpError};

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("hit/", env!("CARGO_PKG_VERSION"));

/// Worker count used when none (or zero) is configured.
pub(super) fn resolve_concurrency(requested: Option<usize>) -> usize {
    match requested {
        Some(value) if value > 0 => value,
        _ => std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
    }
}

/// Connection pool shared by every worker of one run.
pub(super) fn build_http_client(
    concurrency: usize,
    request_timeout: Option<Duration>,
) -> AppResult<Client> {
    let mut client_builder = Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .pool_max_idle_per_host(concurrency);

    if let Some(timeout) = request_timeout {
        client_builder = client_builder.timeout(timeout);
    }

    client_builder.build().map_err(|err| {
        error!("Failed to build HTTP client: {}", err);
        AppError::http(HttpError::BuildClientFailed { source: err })
    })
}
