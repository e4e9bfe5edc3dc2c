use futures_util::StreamExt;
use reqwest::{Client, Request};
use tokio::time::Instant;
use tracing::debug;

use crate::metrics::{AttemptError, RequestOutcome};

/// Sends one attempt and reads the body to the end.
///
/// Never fails: transport problems become an outcome with `error` set. A
/// body that breaks off mid-stream keeps its status and the bytes read so far.
pub async fn send(client: &Client, request: Request) -> RequestOutcome {
    let start = Instant::now();
    match client.execute(request).await {
        Ok(response) => {
            let status = response.status().as_u16();
            match drain_response_body(response).await {
                Ok(bytes) => RequestOutcome::response(status, bytes, start.elapsed()),
                Err(err) => {
                    debug!("Failed to read response body: {}", err.source);
                    RequestOutcome::truncated(
                        status,
                        AttemptError::from_reqwest(&err.source),
                        err.bytes,
                        start.elapsed(),
                    )
                }
            }
        }
        Err(err) => {
            debug!("Request failed: {}", err);
            RequestOutcome::failed(AttemptError::from_reqwest(&err), start.elapsed())
        }
    }
}

struct BodyError {
    source: reqwest::Error,
    bytes: u64,
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, BodyError> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk.map_err(|err| BodyError {
            source: err,
            bytes: total_bytes,
        })?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
