//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;
mod types;
mod validate;


pub use cli::HitArgs;
pub use types::{OutputFormat, PositiveU64, PositiveUsize};
pub use validate::validate_args;

pub(crate) use parsers::parse_header;
