use tracing::warn;

use crate::{
    args::{HitArgs, OutputFormat, PositiveU64, PositiveUsize},
    error::{AppError, AppResult, ValidationError},
    http::{Client, ClientConfig, RequestTemplate},
    shutdown::shutdown_channel,
    shutdown_handlers::{StopReason, setup_deadline_handler, setup_signal_shutdown_handler},
};

use super::banner::print_cli_banner;
use super::summary::{StoppedEarly, print_summary};

/// Runs one load test described by validated `args` and prints its summary.
pub(crate) async fn run_hit(args: HitArgs) -> AppResult<()> {
    let url = args
        .target_url()
        .ok_or_else(|| AppError::validation(ValidationError::MissingUrl))?;
    let template = RequestTemplate::get(url)?.with_headers(&args.headers)?;
    let client = Client::new(ClientConfig {
        concurrency: args.concurrency.map(PositiveUsize::get),
        rate: args.rps.map(PositiveU64::get),
        request_timeout: args.timeout,
        abort_in_flight: args.abort_in_flight,
    });

    if args.output_format == OutputFormat::Text {
        if !args.no_banner {
            print_cli_banner(args.no_color);
        }
        println!(
            "Making {} requests to {} with a concurrency level of {}.",
            args.requests.get(),
            template.url(),
            client.concurrency()
        );
    }

    let (shutdown_tx, _) = shutdown_channel();
    let reason = StopReason::default();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx, &reason);
    let deadline_handle = args
        .duration
        .map(|deadline| setup_deadline_handler(&shutdown_tx, deadline, &reason));

    let result = client.run(&template, args.requests, &shutdown_tx).await;

    // Release the handlers whether or not they fired.
    shutdown_tx.trigger();
    signal_handle.await?;
    if let Some(handle) = deadline_handle {
        handle.await?;
    }
    let summary = result?;

    let cut_short = summary.requests < args.requests.get();
    let stopped_early = if cut_short && reason.interrupted() {
        warn!(
            "Interrupted after {} of {} requests.",
            summary.requests,
            args.requests.get()
        );
        Some(StoppedEarly::Interrupted)
    } else if cut_short && reason.deadline_reached() {
        warn!(
            "Deadline reached after {} of {} requests.",
            summary.requests,
            args.requests.get()
        );
        Some(StoppedEarly::Deadline)
    } else {
        None
    };

    print_summary(&summary, args.output_format, stopped_early)
}
