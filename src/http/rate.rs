use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

use crate::shutdown::ShutdownSender;

use super::workload::STAGE_BUFFER;

const NANOS_PER_SEC: u128 = 1_000_000_000;
/// Smallest pause the throttle will honor; tokio intervals reject zero.
const MIN_DELAY: Duration = Duration::from_nanos(1);

/// Gap between items that lets `concurrency` saturated workers converge on
/// `rate` requests per second in total. `None` when `rate` is zero.
#[must_use]
pub fn throttle_delay(rate: u64, concurrency: usize) -> Option<Duration> {
    if rate == 0 {
        return None;
    }
    let workers = u128::try_from(concurrency.max(1)).unwrap_or(u128::MAX);
    let per_sec = u128::from(rate).saturating_mul(workers);
    let nanos = NANOS_PER_SEC.checked_div(per_sec).unwrap_or(0);
    let delay = Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX));
    Some(delay.max(MIN_DELAY))
}

/// Re-emits `input` in order, at most one item per tick of a `delay` timer.
///
/// Ticks are scheduled from the timer, not from the previous send, so a slow
/// consumer does not push the schedule out. The timer is dropped when the
/// input closes, the output is dropped, or shutdown fires.
pub fn throttle<T>(
    mut input: mpsc::Receiver<T>,
    delay: Duration,
    shutdown_tx: &ShutdownSender,
) -> mpsc::Receiver<T>
where
    T: Send + 'static,
{
    let (tx, rx) = mpsc::channel(STAGE_BUFFER);
    let mut shutdown_rx = shutdown_tx.subscribe();
    let delay = delay.max(MIN_DELAY);

    tokio::spawn(async move {
        let now = Instant::now();
        let first_tick = now.checked_add(delay).unwrap_or(now);
        let mut ticker = interval_at(first_tick, delay);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut forwarded: u64 = 0;

        loop {
            let next = tokio::select! {
                biased;
                () = shutdown_rx.triggered() => break,
                item = input.recv() => item,
            };
            let Some(item) = next else {
                break;
            };
            tokio::select! {
                biased;
                () = shutdown_rx.triggered() => break,
                _ = ticker.tick() => {}
            }
            if tx.send(item).await.is_err() {
                break;
            }
            forwarded = forwarded.saturating_add(1);
        }
        debug!(forwarded, ?delay, "throttle finished");
    });

    rx
}
