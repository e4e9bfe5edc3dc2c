use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Log filter override, checked before `RUST_LOG`.
const LOG_ENV: &str = "HIT_LOG";

/// Installs the global subscriber. Logs go to stderr so stdout only carries
/// the summary.
pub fn init_logging(verbose: bool, no_color: bool) {
    let filter = build_filter(
        std::env::var(LOG_ENV).ok(),
        std::env::var("RUST_LOG").ok(),
        verbose,
    );

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

fn build_filter(hit_log: Option<String>, rust_log: Option<String>, verbose: bool) -> EnvFilter {
    match hit_log.or(rust_log) {
        Some(value) => EnvFilter::try_new(value).unwrap_or_else(|_| EnvFilter::new("info")),
        None if verbose => EnvFilter::new("debug"),
        None => EnvFilter::new("info"),
    }
}
