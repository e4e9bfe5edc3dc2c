use std::time::Duration;

use serde::Serialize;

use crate::args::OutputFormat;
use crate::error::AppResult;
use crate::metrics::{Summary, round_to_micros};

/// Why a run ended before all requests were sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum StoppedEarly {
    Deadline,
    Interrupted,
}

/// Machine-readable form of a [`Summary`]. Durations are whole microseconds.
#[derive(Debug, Serialize)]
pub(crate) struct SummaryRecord {
    pub(crate) requests: u64,
    pub(crate) errors: u64,
    pub(crate) transport_errors: u64,
    pub(crate) bytes: u64,
    pub(crate) success_rate_x100: u64,
    pub(crate) rps_x100: u64,
    pub(crate) duration_us: u64,
    pub(crate) fastest_us: Option<u64>,
    pub(crate) slowest_us: Option<u64>,
    pub(crate) stopped_early: Option<StoppedEarly>,
}

impl SummaryRecord {
    pub(crate) fn new(summary: &Summary, stopped_early: Option<StoppedEarly>) -> Self {
        Self {
            requests: summary.requests,
            errors: summary.errors,
            transport_errors: summary.transport_errors,
            bytes: summary.bytes,
            success_rate_x100: summary.success_rate_x100(),
            rps_x100: summary.rps_x100,
            duration_us: micros(summary.duration),
            fastest_us: summary.fastest.map(micros),
            slowest_us: summary.slowest.map(micros),
            stopped_early,
        }
    }
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(round_to_micros(duration).as_micros()).unwrap_or(u64::MAX)
}

pub(crate) fn summary_lines(summary: &Summary) -> Vec<String> {
    let success = summary.success_rate_x100();
    // Hundredths to tenths, half-up.
    let rps_x10 = summary.rps_x100.saturating_add(5) / 10;

    let mut lines = vec![
        "Summary:".to_owned(),
        line("Success", format!("{}.{:02}%", success / 100, success % 100)),
        line("RPS", format!("{}.{}", rps_x10 / 10, rps_x10 % 10)),
        line("Requests", summary.requests.to_string()),
        line("Errors", summary.errors.to_string()),
    ];
    if summary.transport_errors > 0 {
        lines.push(line("No reply", summary.transport_errors.to_string()));
    }
    lines.push(line("Bytes", summary.bytes.to_string()));
    lines.push(line(
        "Duration",
        format!("{:?}", round_to_micros(summary.duration)),
    ));
    if summary.requests > 1
        && let (Some(fastest), Some(slowest)) = (summary.fastest, summary.slowest)
    {
        lines.push(line("Fastest", format!("{:?}", round_to_micros(fastest))));
        lines.push(line("Slowest", format!("{:?}", round_to_micros(slowest))));
    }
    lines
}

fn line(label: &str, value: String) -> String {
    format!("    {:<9}: {}", label, value)
}

/// Writes the summary to stdout in the requested format.
///
/// # Errors
///
/// Returns an error when the JSON record cannot be serialized.
pub(crate) fn print_summary(
    summary: &Summary,
    format: OutputFormat,
    stopped_early: Option<StoppedEarly>,
) -> AppResult<()> {
    match format {
        OutputFormat::Text => {
            println!();
            for line in summary_lines(summary) {
                println!("{}", line);
            }
        }
        OutputFormat::Json => {
            let record = SummaryRecord::new(summary, stopped_early);
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}
