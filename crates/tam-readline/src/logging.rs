use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const ENV_LOG: &str = "TAM_LOG";
const LOG_FILE_PREFIX: &str = "tam.log";

/// Sends tracing output to a daily-rolling file so it never interleaves
/// with the REPL.
///
/// `TAM_LOG` wins over `default_level`. Keep the returned guard alive
/// until exit or buffered lines are lost.
pub fn init_logging(logs_dir: &Path, default_level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("creating log directory {}", logs_dir.display()))?;

    let filter = EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("invalid log filter")?;

    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to set tracing subscriber: {}", err))?;

    Ok(guard)
}
