use std::fs;
use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::AppResult;

const LOG_FILE_PREFIX: &str = "broker.log";

/// Initialize logger system.
///
/// Console output is always on. When `log_dir` is given a daily rolling file
/// layer is added; the returned guard must be held until shutdown so the
/// background writer flushes.
pub fn init_logger(log_dir: Option<&Path>) -> AppResult<Option<WorkerGuard>> {
    // Capture log macro logs
    let _ = tracing_log::LogTracer::init();

    // Default to INFO and above
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::Layer::new()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::Layer::new()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_level(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // try_init so a second call (tests, embedding) is not fatal
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    match log_dir {
        Some(dir) => info!("Logger initialized (console + file in {})", dir.display()),
        None => info!("Logger initialized (console)"),
    }

    Ok(guard)
}
