use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "tutor.log";

/// Keeps the non-blocking file writer flushing until dropped.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    /// Daily-rolling file output next to stdout when set.
    pub file_dir: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            file_dir: None,
        }
    }

    /// `ENABLE_FILE_LOGS=true|1` turns on file output under `LOG_DIR` (default `./logs`).
    pub fn from_env(level: impl Into<String>) -> Self {
        let enabled = std::env::var("ENABLE_FILE_LOGS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let file_dir = enabled.then(|| {
            std::env::var("LOG_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./logs"))
        });

        Self {
            level: level.into(),
            file_dir,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

pub fn init_tracing(config: &LoggingConfig) -> Option<FileLogGuard> {
    let file_dir = config.file_dir.as_ref().filter(|dir| match std::fs::create_dir_all(dir) {
        Ok(()) => true,
        Err(err) => {
            eprintln!("failed to create log directory {}: {err}", dir.display());
            false
        }
    });

    let (file_layer, guard) = match file_dir {
        Some(dir) => {
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false).with_target(true);
            (Some(layer), Some(FileLogGuard { _guard: guard }))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_no_file_output() {
        let config = LoggingConfig::new("debug");
        assert_eq!(config.level, "debug");
        assert!(config.file_dir.is_none());
    }

    #[test]
    fn test_level_becomes_env_filter() {
        let config = LoggingConfig::new("info");
        assert_eq!(config.env_filter().to_string(), "info");
    }
}
