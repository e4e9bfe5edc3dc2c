mod app;
mod entry;
mod logger;
mod shutdown_handlers;

use hit::{args, config, error, http, metrics, shutdown};

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
