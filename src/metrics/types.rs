use std::fmt;
use std::time::Duration;

/// First status code treated as a failed attempt (client and server errors).
const FIRST_ERROR_STATUS: u16 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptErrorKind {
    Timeout,
    Connect,
    Body,
    Cancelled,
    Request,
}

impl AttemptErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AttemptErrorKind::Timeout => "timeout",
            AttemptErrorKind::Connect => "connect",
            AttemptErrorKind::Body => "body",
            AttemptErrorKind::Cancelled => "cancelled",
            AttemptErrorKind::Request => "request",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptError {
    pub kind: AttemptErrorKind,
    pub message: String,
}

impl AttemptError {
    #[must_use]
    pub fn new(kind: AttemptErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            AttemptErrorKind::Timeout
        } else if err.is_connect() {
            AttemptErrorKind::Connect
        } else if err.is_body() || err.is_decode() {
            AttemptErrorKind::Body
        } else {
            AttemptErrorKind::Request
        };
        Self::new(kind, err.to_string())
    }
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

/// Outcome of a single attempt, produced once by the worker that sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    /// Response status; `None` when no response was obtained.
    pub status: Option<u16>,
    pub error: Option<AttemptError>,
    /// Body bytes actually read.
    pub bytes: u64,
    pub duration: Duration,
}

impl RequestOutcome {
    #[must_use]
    pub const fn response(status: u16, bytes: u64, duration: Duration) -> Self {
        Self {
            status: Some(status),
            error: None,
            bytes,
            duration,
        }
    }

    #[must_use]
    pub const fn failed(error: AttemptError, duration: Duration) -> Self {
        Self {
            status: None,
            error: Some(error),
            bytes: 0,
            duration,
        }
    }

    /// A response whose body could not be read to the end.
    #[must_use]
    pub const fn truncated(
        status: u16,
        error: AttemptError,
        bytes: u64,
        duration: Duration,
    ) -> Self {
        Self {
            status: Some(status),
            error: Some(error),
            bytes,
            duration,
        }
    }

    /// Error set, no status, or a status in the 4xx/5xx range.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
            || self
                .status
                .is_none_or(|status| status >= FIRST_ERROR_STATUS)
    }

    #[must_use]
    pub const fn is_transport_error(&self) -> bool {
        self.status.is_none()
    }
}
