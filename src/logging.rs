//! Logging setup.
//!
//! Events go to stderr and to a daily rolling run log, so a migration leaves
//! a record of every photo it skipped or failed on.

use anyhow::Result;
use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the logging system.
///
/// The level can be set with the `FSPOT_XMP_LOG` environment variable and
/// defaults to `info`, or `debug` when `verbose` is set. If the log
/// directory cannot be created, only the console layer is installed.
pub fn init(verbose: bool, log_dir: &Path) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_env("FSPOT_XMP_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .boxed();

    let file = match std::fs::create_dir_all(log_dir) {
        Ok(()) => {
            let file_appender = tracing_appender::rolling::daily(log_dir, "fspot-xmp.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Flushes the file writer on exit; init() runs once per process.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false).boxed())
        }
        Err(_) => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .try_init()?;

    tracing::debug!("Logging initialized, run log in {:?}", log_dir);
    Ok(())
}
