use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{EtlError, Result};

const LOG_FILE_PREFIX: &str = "momo_etl.log";

/// Daily-rotating appender under `log_dir`, creating the directory if needed
fn file_appender(log_dir: &Path) -> Result<RollingFileAppender> {
    fs::create_dir_all(log_dir)?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(log_dir)
        .map_err(|e| {
            EtlError::Config(format!("Cannot log to '{}': {}", log_dir.display(), e))
        })
}

/// Initializes the logging system with both console and file output.
///
/// Console output goes to stderr so that `--output -` can stream the entity
/// document on stdout without interleaved log lines. When `log_dir` is not
/// writable, logging continues on the console only.
pub fn init_logging(log_dir: &Path) {
    let (file_layer, guard, file_error) = match file_appender(log_dir) {
        Ok(appender) => {
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(non_blocking_writer);
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    // Create a formatted layer for console logging
    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    // Respect RUST_LOG if set; otherwise default to info for our crate
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("momo_etl=info,warn"));

    // try_init so repeated calls (tests, embedding) do not panic
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    if let Some(e) = file_error {
        tracing::warn!("File logging disabled: {}", e);
    }

    // Keep the guard alive for the whole process so logs are flushed on exit
    if let Some(guard) = guard {
        std::mem::forget(guard);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_appender_creates_log_dir() {
        let dir = tempdir().unwrap();
        let log_dir = dir.path().join("nested").join("logs");

        assert!(file_appender(&log_dir).is_ok());
        assert!(log_dir.is_dir());
    }

    #[test]
    fn test_unusable_log_dir_is_error_not_panic() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        assert!(file_appender(&blocker.join("logs")).is_err());
    }

    #[test]
    fn test_init_logging_survives_unusable_log_dir() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        init_logging(&blocker.join("logs"));
        init_logging(&blocker.join("logs"));
    }
}
