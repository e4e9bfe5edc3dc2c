use std::time::Duration;

use serde::Deserialize;

use crate::args::OutputFormat;
use crate::args::parsers::parse_duration_arg;
use crate::error::AppResult;

/// Settings read from `hit.toml` / `hit.json`. Every field is optional and
/// only fills in what the command line left unset.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub requests: Option<u64>,
    pub concurrency: Option<usize>,
    pub rps: Option<u64>,
    pub timeout: Option<DurationValue>,
    pub duration: Option<DurationValue>,
    pub headers: Option<Vec<String>>,
    pub abort_in_flight: Option<bool>,
    pub output_format: Option<OutputFormat>,
    pub no_banner: Option<bool>,
}

/// Either whole seconds (`30`) or a string with a unit (`"250ms"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> AppResult<Duration> {
        match self {
            DurationValue::Seconds(secs) => parse_duration_arg(&secs.to_string()),
            DurationValue::Text(text) => parse_duration_arg(text),
        }
    }
}
