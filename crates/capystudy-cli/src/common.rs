//! Helpers shared by the CLI commands.

use std::error::Error;
use std::future::Future;

use capystudy_core::{Config, Database, Store};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

pub type CliResult<T = ()> = Result<T, Box<dyn Error>>;

/// Install the stderr subscriber. `CAPYSTUDY_LOG` wins over the config level.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_env("CAPYSTUDY_LOG").unwrap_or_else(|_| {
        EnvFilter::new(format!("capystudy_core={level},capystudy={level}", level = config.log.level))
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Open the on-disk record store.
pub fn open_store() -> CliResult<Store> {
    Ok(Store::new(Database::open()?))
}

pub fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run a future to completion on a fresh runtime.
pub fn block_on<F: Future>(future: F) -> CliResult<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}
