use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with both console and file output.
///
/// Each pipeline writes to its own daily-rotated file under `logs/`,
/// e.g. `logs/jobs_scraper.log.2026-10-19`. The returned guard must be held
/// until exit so the last lines (the run summary) reach the file.
pub fn init_logging(pipeline: &str) -> WorkerGuard {
    // Ensure logs directory exists
    let _ = fs::create_dir_all("logs");

    let file_name = format!("{pipeline}_scraper.log");
    let file_appender = tracing_appender::rolling::daily("logs", file_name);
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    // Plain text in the file, same as the console, minus colors
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(non_blocking_writer);

    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stdout);

    // Respect RUST_LOG if set; otherwise info for everything
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ango_scraper=info,info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    guard
}
