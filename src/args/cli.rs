use clap::Parser;
use std::time::Duration;

use super::parsers::{
    parse_bool_env, parse_duration_arg, parse_header, parse_positive_u64, parse_positive_usize,
};
use super::types::{OutputFormat, PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "hit",
    version,
    about = "Fire a fixed number of HTTP GET requests at a URL and summarize the responses."
)]
pub struct HitArgs {
    /// HTTP server URL to make requests to
    #[arg(value_name = "URL", conflicts_with = "url")]
    pub target: Option<String>,

    /// HTTP server URL to make requests to (same as the positional URL)
    #[arg(long, short)]
    pub url: Option<String>,

    /// Number of requests to make
    #[arg(
        long = "requests",
        short = 'n',
        default_value = "100",
        value_parser = parse_positive_u64
    )]
    pub requests: PositiveU64,

    /// Concurrency level (defaults to the number of available CPUs)
    #[arg(long = "concurrency", short = 'c', value_parser = parse_positive_usize)]
    pub concurrency: Option<PositiveUsize>,

    /// Target requests per second across all workers (optional)
    #[arg(long = "rps", value_parser = parse_positive_u64)]
    pub rps: Option<PositiveU64>,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", value_parser = parse_duration_arg)]
    pub timeout: Option<Duration>,

    /// Stop the run after this long even if requests remain (supports ms/s/m/h)
    #[arg(long = "duration", short = 'd', value_parser = parse_duration_arg)]
    pub duration: Option<Duration>,

    /// HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long, short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Drop requests still in flight when the run is stopped and count them as errors
    #[arg(long = "abort-in-flight")]
    pub abort_in_flight: bool,

    /// Output format
    #[arg(long = "output-format", value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    /// Path to config file (TOML/JSON). Defaults to ./hit.toml or ./hit.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Do not print the banner
    #[arg(long = "no-banner")]
    pub no_banner: bool,

    /// Enable verbose logging (sets log level to debug unless overridden by HIT_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}

impl HitArgs {
    /// The target URL from `--url` or the positional argument.
    #[must_use]
    pub fn target_url(&self) -> Option<&str> {
        self.url.as_deref().or(self.target.as_deref())
    }
}
