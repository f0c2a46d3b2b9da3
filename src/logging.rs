use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_DIR: &str = "logs";

/// Initializes console and JSON file logging.
///
/// The returned guard flushes the file writer when dropped, so keep it alive for the
/// whole run.
pub fn init_logging() -> anyhow::Result<WorkerGuard> {
    fs::create_dir_all(LOG_DIR)?;

    // Daily rotated JSON log for later review of rule decisions
    let file_appender = tracing_appender::rolling::daily(LOG_DIR, "ve_session_import.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);
    let console_layer = fmt::layer().with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("ve_session_import=info".parse()?))
        .with(file_layer)
        .with(console_layer)
        .try_init()?;

    Ok(guard)
}
