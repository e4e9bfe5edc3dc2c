//! Per-attempt outcomes and the run-wide aggregate they fold into.
mod collector;
mod types;

#[cfg(test)]
mod tests;

pub use collector::{Aggregate, Summary, round_to_micros};
pub use types::{AttemptError, AttemptErrorKind, RequestOutcome};
