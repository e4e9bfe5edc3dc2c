use std::time::Duration;

use super::RequestOutcome;

/// Scale applied to rates and percentages so they stay integral.
const HUNDREDTHS: u128 = 100;
const MICROS_PER_SEC: u128 = 1_000_000;
const NANOS_PER_MICRO: u128 = 1_000;
const HALF_MICRO_NANOS: u128 = 500;
/// Percentage scaled by 100 (two decimals).
const PERCENT_X100: u128 = 10_000;

/// Running totals for one run.
///
/// Owned by the single consumer that drains the dispatcher output; workers
/// never touch it. Turned into a read-only [`Summary`] by [`Aggregate::finalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    requests: u64,
    errors: u64,
    transport_errors: u64,
    bytes: u64,
    fastest: Option<Duration>,
    slowest: Option<Duration>,
}

impl Aggregate {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            requests: 0,
            errors: 0,
            transport_errors: 0,
            bytes: 0,
            fastest: None,
            slowest: None,
        }
    }

    pub fn merge(&mut self, outcome: &RequestOutcome) {
        self.requests = self.requests.saturating_add(1);
        self.bytes = self.bytes.saturating_add(outcome.bytes);

        self.fastest = Some(
            self.fastest
                .map_or(outcome.duration, |fastest| fastest.min(outcome.duration)),
        );
        self.slowest = Some(
            self.slowest
                .map_or(outcome.duration, |slowest| slowest.max(outcome.duration)),
        );

        if outcome.is_error() {
            self.errors = self.errors.saturating_add(1);
        }
        if outcome.is_transport_error() {
            self.transport_errors = self.transport_errors.saturating_add(1);
        }
    }

    /// Stamps the wall-clock duration and derives the request rate.
    #[must_use]
    pub fn finalize(self, elapsed: Duration) -> Summary {
        let elapsed_us = elapsed.as_micros().max(1);
        let scaled = u128::from(self.requests)
            .saturating_mul(HUNDREDTHS)
            .saturating_mul(MICROS_PER_SEC)
            .checked_div(elapsed_us)
            .unwrap_or(0);

        Summary {
            requests: self.requests,
            errors: self.errors,
            transport_errors: self.transport_errors,
            bytes: self.bytes,
            fastest: self.fastest,
            slowest: self.slowest,
            duration: elapsed,
            rps_x100: u64::try_from(scaled).unwrap_or(u64::MAX),
        }
    }

    #[must_use]
    pub const fn requests(&self) -> u64 {
        self.requests
    }

    #[must_use]
    pub const fn errors(&self) -> u64 {
        self.errors
    }

    #[must_use]
    pub const fn transport_errors(&self) -> u64 {
        self.transport_errors
    }

    #[must_use]
    pub const fn bytes(&self) -> u64 {
        self.bytes
    }

    #[must_use]
    pub const fn fastest(&self) -> Option<Duration> {
        self.fastest
    }

    #[must_use]
    pub const fn slowest(&self) -> Option<Duration> {
        self.slowest
    }
}

/// Finalized result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub requests: u64,
    /// Attempts with an error, no response, or a status >= 400.
    pub errors: u64,
    /// Subset of `errors` where no response was received at all.
    pub transport_errors: u64,
    pub bytes: u64,
    pub fastest: Option<Duration>,
    pub slowest: Option<Duration>,
    pub duration: Duration,
    /// Requests per second, times 100.
    pub rps_x100: u64,
}

impl Summary {
    /// Share of attempts that succeeded, as a percentage times 100.
    #[must_use]
    pub fn success_rate_x100(&self) -> u64 {
        if self.requests == 0 {
            return 0;
        }
        let ok = self.requests.saturating_sub(self.errors);
        let scaled = u128::from(ok)
            .saturating_mul(PERCENT_X100)
            .checked_div(u128::from(self.requests))
            .unwrap_or(0);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }
}

/// Rounds half away from zero to whole microseconds.
#[must_use]
pub fn round_to_micros(duration: Duration) -> Duration {
    let micros = duration
        .as_nanos()
        .saturating_add(HALF_MICRO_NANOS)
        .checked_div(NANOS_PER_MICRO)
        .unwrap_or(0);
    Duration::from_micros(u64::try_from(micros).unwrap_or(u64::MAX))
}
