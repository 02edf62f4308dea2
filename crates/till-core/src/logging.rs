//! Tracing subscriber setup.
//!
//! Logs go to a daily-rolling file under `$TILL_HOME/logs` and, when
//! requested, to stderr. The filter comes from `TILL_LOG` and defaults to
//! `info` for every till crate, the `till` binary (`till_cli`) included.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV: &str = "TILL_LOG";

const DEFAULT_FILTER: &str = "till_core=info,till_login=info,till_cli=info";

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Mirror log lines to stderr.
    pub stderr: bool,
    /// Directory for rolling log files; `None` disables file logging.
    pub dir: Option<PathBuf>,
}

/// Installs the global subscriber.
///
/// Keep the returned guard alive for the life of the process, dropping it
/// flushes the file writer.
pub fn init(opts: &LogOptions) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stderr_layer = opts
        .stderr
        .then(|| fmt::layer().with_target(false).with_writer(std::io::stderr));

    let (file_layer, guard) = match &opts.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "till.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("install tracing subscriber")?;

    Ok(guard)
}
