use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::formatter::BracketedFormatter;
use crate::core::error::BalanceResult;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

/// Console log sink; stdout is left to command output
const CONSOLE_WRITER: fn() -> std::io::Stderr = std::io::stderr;

/// Install stderr and file logging. The log file is
/// `<log_dir>/particle_balance_<timestamp>.log`; its path is returned.
pub fn setup_logging(log_dir: &Path) -> BalanceResult<PathBuf> {
    fs::create_dir_all(log_dir)?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_path = log_dir.join(format!("particle_balance_{}.log", timestamp));

    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)?;

    let file_layer = fmt::layer()
        .event_format(BracketedFormatter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false);

    let console_layer = fmt::layer()
        .event_format(BracketedFormatter)
        .with_writer(CONSOLE_WRITER);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A second install (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    info!("Log file created at: {:?}", log_path);
    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_console_logs_go_to_stderr() {
        let mut console: std::io::Stderr = CONSOLE_WRITER();
        assert!(console.flush().is_ok());
    }

    #[test]
    fn test_setup_logging_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let path = setup_logging(&log_dir).unwrap();
        assert!(path.starts_with(&log_dir));
        assert!(path.exists());
    }
}
