//! Logging infrastructure for warclip
//!
//! Logs are written to `~/.local/state/warclip/` following XDG standards, one
//! file per day named `warclip.<YYYY-MM-DD>.log`.

use crate::config::{Config, LoggingConfig};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_PREFIX: &str = "warclip";
const LOG_SUFFIX: &str = "log";

/// Initialize the logging system
///
/// Sets up tracing with:
/// - File output to XDG state directory
/// - Daily rotation, keeping at most `max_files` files
/// - Configurable log level via config or RUST_LOG env var
pub fn init(config: &LoggingConfig) -> crate::error::Result<LoggingGuard> {
    let log_dir = Config::state_dir();

    let file_appender = file_appender(&log_dir, config)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    tracing::info!(
        log_dir = %log_dir.display(),
        level = %config.level,
        "Logging initialized"
    );

    Ok(LoggingGuard { _guard: guard })
}

fn file_appender(
    log_dir: &Path,
    config: &LoggingConfig,
) -> crate::error::Result<RollingFileAppender> {
    std::fs::create_dir_all(log_dir)?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix(LOG_SUFFIX)
        .max_log_files(config.max_files.max(1))
        .build(log_dir)
        .map_err(|e| {
            crate::error::Error::Config(format!("failed to create log appender: {}", e))
        })
}

/// Guard that keeps the logging system alive
///
/// When dropped, flushes any pending log writes.
pub struct LoggingGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Most recent daily log file in `log_dir`, if any has been written
pub fn latest_log_file(log_dir: &Path) -> Option<PathBuf> {
    let pattern = format!(
        "{}/{}.*.{}",
        glob::Pattern::escape(&log_dir.to_string_lossy()),
        LOG_PREFIX,
        LOG_SUFFIX
    );

    // Dated names sort chronologically.
    glob::glob(&pattern)
        .ok()?
        .filter_map(|entry| entry.ok())
        .max_by(|a, b| a.file_name().cmp(&b.file_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn appender_writes_file_found_by_latest_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("warclip");
        assert!(latest_log_file(&log_dir).is_none());

        let mut appender = file_appender(&log_dir, &LoggingConfig::default()).unwrap();
        appender.write_all(b"tag persisted\n").unwrap();
        appender.flush().unwrap();

        let path = latest_log_file(&log_dir).expect("log file written");
        assert!(path.exists());

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("warclip."), "got {name}");
        assert!(name.ends_with(".log"), "got {name}");
        assert_ne!(name, "warclip.log");
        assert!(std::fs::read_to_string(&path).unwrap().contains("tag persisted"));
    }

    #[test]
    fn latest_log_file_picks_newest_day() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["warclip.2024-09-09.log", "warclip.2024-09-10.log", "other.log"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }

        let latest = latest_log_file(dir.path()).unwrap();
        assert!(latest.ends_with("warclip.2024-09-10.log"));
    }
}
