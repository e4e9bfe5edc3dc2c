//! Core library for the `hit` CLI.
//!
//! A run repeats one GET request template a fixed number of times. Requests
//! flow through a producer, an optional throttle and a bounded pool of
//! workers; every attempt's outcome is folded by a single consumer into an
//! [`metrics::Aggregate`] and finalized into a [`metrics::Summary`].
//! [`http::Client::run`] is the entry point; the `hit` binary adds flag
//! parsing, config files and summary rendering around it.
pub mod args;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod shutdown;
