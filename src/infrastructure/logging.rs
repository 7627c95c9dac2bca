//! Logging initialization.
//!
//! The terminal belongs to the form while it runs, so logs go to
//! `<logs dir>/stepform-{datetime}.log` unless file logging is disabled.

use std::path::PathBuf;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::settings::Settings;

/// Keeps the background writer alive; drop it last to flush buffered logs.
pub struct LoggingHandle {
    pub _guard: Option<WorkerGuard>,
    pub log_file_path: Option<PathBuf>,
}

pub fn log_file_name(timestamp: chrono::DateTime<chrono::Utc>) -> String {
    format!("stepform-{}.log", timestamp.format("%Y%m%dT%H%M%SZ"))
}

/// Installs the global subscriber. `debug_override` comes from `--debug`.
pub fn init_logging(settings: &Settings, debug_override: bool) -> Result<LoggingHandle> {
    let level = if debug_override {
        "debug".to_string()
    } else {
        settings.logging.level.clone()
    };
    let filter = tracing_subscriber::EnvFilter::new(std::env::var("RUST_LOG").unwrap_or(level));

    if !settings.logging.to_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
        return Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        });
    }

    let logs_dir = settings.logs_path();
    std::fs::create_dir_all(&logs_dir)?;
    let file_name = log_file_name(chrono::Utc::now());
    let log_file_path = logs_dir.join(&file_name);

    let file_appender = tracing_appender::rolling::never(&logs_dir, &file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    Ok(LoggingHandle {
        _guard: Some(guard),
        log_file_path: Some(log_file_path),
    })
}
