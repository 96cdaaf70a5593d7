//! Logging system initialization
//!
//! Sets up the global tracing subscriber from `LoggingConfig`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::errors::{RelayError, Result};

const DEFAULT_LOG_FILE_NAME: &str = "shortlink-relay.log";

/// `RUST_LOG` wins over the configured level when set.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Logging for client commands: warnings only, console only.
///
/// The server's log file is never shared with a client process.
pub fn client_logging_config(config: &LoggingConfig) -> LoggingConfig {
    LoggingConfig {
        level: "warn".to_string(),
        file: None,
        enable_rotation: false,
        ..config.clone()
    }
}

fn build_writer(config: &LoggingConfig) -> Result<Box<dyn std::io::Write + Send + Sync>> {
    let Some(log_file) = config.file.as_deref().filter(|f| !f.is_empty()) else {
        return Ok(Box::new(std::io::stdout()));
    };

    if config.enable_rotation {
        let path = Path::new(log_file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(DEFAULT_LOG_FILE_NAME);

        let appender = rolling::Builder::new()
            .rotation(rolling::Rotation::DAILY)
            .filename_prefix(filename.trim_end_matches(".log"))
            .filename_suffix("log")
            .max_log_files(config.max_backups.max(1) as usize)
            .build(dir)
            .map_err(|e| {
                RelayError::file_operation(format!(
                    "Failed to create rolling log appender in {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        Ok(Box::new(appender))
    } else {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .map_err(|e| {
                RelayError::file_operation(format!("Failed to open log file {}: {}", log_file, e))
            })?;
        Ok(Box::new(file))
    }
}

/// Initialize logging system based on configuration
///
/// Call once at startup. The returned guard must live as long as the
/// program so buffered lines are flushed on exit.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let writer = build_writer(config)?;
    let to_console = config.file.as_ref().is_none_or(|f| f.is_empty());

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(build_filter(&config.level))
        .with_level(true)
        .with_ansi(to_console);

    let result = if config.format == "json" {
        subscriber_builder.json().try_init()
    } else {
        subscriber_builder.try_init()
    };

    result.map_err(|e| RelayError::config(format!("Failed to install log subscriber: {}", e)))?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_writer_creates_plain_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.log");
        let config = LoggingConfig {
            file: Some(path.to_string_lossy().into_owned()),
            enable_rotation: false,
            ..Default::default()
        };

        let mut writer = build_writer(&config).unwrap();
        writer.write_all(b"hello\n").unwrap();
        writer.flush().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_client_config_drops_server_log_file() {
        let server = LoggingConfig {
            level: "debug".to_string(),
            format: "json".to_string(),
            file: Some("/var/log/shortlink-relay.log".to_string()),
            enable_rotation: true,
            ..Default::default()
        };

        let client = client_logging_config(&server);
        assert_eq!(client.level, "warn");
        assert_eq!(client.file, None);
        assert!(!client.enable_rotation);
        assert_eq!(client.format, "json");
        assert_eq!(server.file.as_deref(), Some("/var/log/shortlink-relay.log"));
    }

    #[test]
    fn test_writer_rejects_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            file: Some(
                dir.path()
                    .join("missing")
                    .join("relay.log")
                    .to_string_lossy()
                    .into_owned(),
            ),
            enable_rotation: false,
            ..Default::default()
        };
        assert!(build_writer(&config).is_err());
    }
}
