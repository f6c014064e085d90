use std::path::Path;

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const LOG_FILE_NAME: &str = "cs3split.log";
/// Daily files kept before the oldest is removed
const MAX_LOG_FILES: usize = 7;

/// Install the global subscriber. Logs always go to stderr; with `log_dir`
/// they are also appended to a daily rolled file in that directory.
///
/// The returned guard flushes the file writer and must outlive the program.
pub fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    let (file_layer, guard) = match log_dir.map(open_rolling_log) {
        Some(Ok(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        Some(Err(e)) => {
            eprintln!("Failed to open log directory, logging to stderr only: {e}");
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

fn open_rolling_log(dir: &Path) -> std::io::Result<BasicRollingFileAppender> {
    std::fs::create_dir_all(dir)?;
    BasicRollingFileAppender::new(
        dir.join(LOG_FILE_NAME),
        RollingConditionBasic::new().daily(),
        MAX_LOG_FILES,
    )
}
