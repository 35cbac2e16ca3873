use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::model::config::LogConfig;

/// Log directory: the configured one, else `<data dir>/chronic/logs`.
pub fn log_dir(config: &LogConfig) -> Option<PathBuf> {
    config
        .dir
        .clone()
        .or_else(|| dirs::data_local_dir().map(|d| d.join("chronic").join("logs")))
}

/// Send tracing output to a daily rolling file. The terminal belongs to the
/// TUI, so nothing is written to stdout/stderr.
///
/// Returns the writer guard; keep it alive until exit so buffered lines are
/// flushed. `None` means logging is off (no usable directory).
pub fn init_logging(config: &LogConfig) -> Option<WorkerGuard> {
    let dir = log_dir(config)?;
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("warning: could not create log dir {}: {}", dir.display(), e);
        return None;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let appender = tracing_appender::rolling::daily(&dir, "chronic.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_ansi(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();
    tracing::info!(dir = %dir.display(), "logging initialized");
    Some(guard)
}
