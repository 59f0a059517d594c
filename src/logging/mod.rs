//! Diagnostic logging to a file.
//!
//! The terminal belongs to the UI, so `tracing` output goes to
//! `<data dir>/chatdeck/chatdeck.log` (or the configured path) with ANSI
//! colours off. `RUST_LOG` overrides the configured level.

use crate::config::model::LoggingConfig;
use crate::config::APP_DIR;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn log_file_path(config: &LoggingConfig) -> PathBuf {
    config.file.clone().unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("chatdeck.log")
    })
}

pub fn init(config: &LoggingConfig) -> Result<PathBuf> {
    let path = log_file_path(config);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let level = config.level.clone();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.into()),
        )
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file))
        .init();
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_path_wins() {
        let config = LoggingConfig {
            level: "debug".into(),
            file: Some(PathBuf::from("/tmp/chatdeck-test.log")),
        };
        assert_eq!(log_file_path(&config), PathBuf::from("/tmp/chatdeck-test.log"));
        assert!(log_file_path(&LoggingConfig::default()).ends_with("chatdeck/chatdeck.log"));
    }
}
