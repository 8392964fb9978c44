//! Logging Module
//!
//! Sets up `tracing` with:
//! - A pretty, human-readable stdout layer
//! - An optional daily-rolling JSON file layer for later ingestion
//!
//! Library code logs through the `log` macros; tracing-subscriber's log
//! bridge forwards those records into the same layers.

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

/// File name prefix for rolled log files.
pub const LOG_FILE_NAME: &str = "word-tutor.log";

/// Initialize global logging.
///
/// Returns the file writer guard when file logging is active. The guard must
/// be held for the life of the process, otherwise buffered lines are lost.
pub fn init(config: &LoggingConfig, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = build_filter(&config.default_filter);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .pretty()
        .with_filter(env_filter.clone());

    let (file_layer, guard) = match log_dir.filter(|_| config.file_logging) {
        Some(dir) => match prepare_log_dir(dir) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                let layer = tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .json()
                    .with_file(true)
                    .with_line_number(true)
                    .with_thread_ids(true)
                    .with_target(true)
                    .with_filter(env_filter);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!("Failed to create logs directory {}: {}", dir.display(), e);
                (None, None)
            }
        },
        None => (None, None),
    };

    if let Err(e) = tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
    {
        eprintln!("Logging already initialized: {}", e);
    }

    log::info!(
        "Logging initialized (file logging: {})",
        if guard.is_some() { "on" } else { "off" }
    );

    guard
}

/// `RUST_LOG` wins; otherwise fall back to the configured filter, then `info`.
fn build_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn prepare_log_dir(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
