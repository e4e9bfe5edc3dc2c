use url::Url;

use super::HitArgs;
use crate::error::{AppError, AppResult, ValidationError};

/// Checks the flag combination before any request is built.
///
/// # Errors
///
/// Returns an error when the URL is missing, unparsable, not http(s) or
/// hostless, or when an explicit `-c` is larger than `-n`.
pub fn validate_args(args: &HitArgs) -> AppResult<()> {
    if let Some(concurrency) = args.concurrency {
        let requests = args.requests.get();
        let fits = u64::try_from(concurrency.get()).is_ok_and(|value| value <= requests);
        if !fits {
            return Err(AppError::validation(
                ValidationError::ConcurrencyExceedsRequests {
                    concurrency: concurrency.get(),
                    requests,
                },
            ));
        }
    }

    validate_url(args.target_url().unwrap_or_default())
}

fn validate_url(raw: &str) -> AppResult<()> {
    if raw.trim().is_empty() {
        return Err(AppError::validation(ValidationError::MissingUrl));
    }
    let url = Url::parse(raw).map_err(|err| {
        AppError::validation(ValidationError::InvalidUrl {
            url: raw.to_owned(),
            source: err,
        })
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::validation(ValidationError::UnsupportedScheme {
            scheme: url.scheme().to_owned(),
        }));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(AppError::validation(ValidationError::UrlMissingHost));
    }
    Ok(())
}
