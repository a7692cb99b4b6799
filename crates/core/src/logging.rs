//! Rotating file logs for the editor.
//!
//! # Invariants
//! - Initialization happens at most once per process and never panics.
//! - Re-initializing with the same directory and level is a no-op.
//! - Re-initializing with a different directory or level is rejected.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use thiserror::Error;

const LOG_FILE_BASENAME: &str = "rceditor";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

/// 日誌初始化錯誤。 / Errors raised while starting the file logger.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoggingError {
    #[error("unsupported log level `{0}`; expected trace|debug|info|warn|error")]
    UnsupportedLevel(String),
    #[error("log directory must be an absolute path, got `{0}`")]
    RelativeDir(PathBuf),
    #[error("failed to create log directory `{path}`: {message}")]
    CreateDir { path: PathBuf, message: String },
    #[error("failed to start logger: {0}")]
    Backend(String),
    #[error("logging already initialized with {current}; refusing to switch to {requested}")]
    Conflict { current: String, requested: String },
}

/// Starts file logging under `log_dir` at `level`.
pub fn init_logging(level: &str, log_dir: impl AsRef<Path>) -> Result<(), LoggingError> {
    let level = normalize_level(level)?;
    let log_dir = log_dir.as_ref();
    if !log_dir.is_absolute() {
        return Err(LoggingError::RelativeDir(log_dir.to_path_buf()));
    }
    let log_dir = log_dir.to_path_buf();

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, LoggingError> {
        std::fs::create_dir_all(&log_dir).map_err(|err| LoggingError::CreateDir {
            path: log_dir.clone(),
            message: err.to_string(),
        })?;

        let logger = Logger::try_with_str(level)
            .map_err(|err| LoggingError::Backend(err.to_string()))?
            .log_to_file(
                FileSpec::default()
                    .directory(log_dir.as_path())
                    .basename(LOG_FILE_BASENAME),
            )
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .map_err(|err| LoggingError::Backend(err.to_string()))?;

        info!(
            "event=app_start module=logging status=ok platform={} version={} level={} log_dir={}",
            std::env::consts::OS,
            env!("CARGO_PKG_VERSION"),
            level,
            log_dir.display()
        );

        Ok(LoggingState {
            level,
            log_dir: log_dir.clone(),
            _logger: logger,
        })
    })?;

    if state.log_dir != log_dir {
        return Err(LoggingError::Conflict {
            current: format!("directory `{}`", state.log_dir.display()),
            requested: format!("`{}`", log_dir.display()),
        });
    }
    if state.level != level {
        return Err(LoggingError::Conflict {
            current: format!("level `{}`", state.level),
            requested: format!("`{level}`"),
        });
    }
    Ok(())
}

/// Returns `(level, log_dir)` once logging is active.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.log_dir.clone()))
}

pub fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::UnsupportedLevel(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn normalize_level_accepts_known_values() {
        assert_eq!(normalize_level(" WARNING "), Ok("warn"));
        assert_eq!(normalize_level("Info"), Ok("info"));
        assert!(matches!(
            normalize_level("verbose"),
            Err(LoggingError::UnsupportedLevel(_))
        ));
    }

    #[test]
    fn relative_directory_is_rejected() {
        let err = init_logging("info", "logs/dev").unwrap_err();
        assert!(matches!(err, LoggingError::RelativeDir(_)));
    }

    #[test]
    fn init_is_idempotent_and_rejects_conflicts() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();

        init_logging("info", first.path()).expect("first init");
        init_logging("info", first.path()).expect("same config is a no-op");

        let level_err = init_logging("debug", first.path()).unwrap_err();
        assert!(level_err.to_string().contains("refusing to switch"));
        let dir_err = init_logging("info", second.path()).unwrap_err();
        assert!(matches!(dir_err, LoggingError::Conflict { .. }));

        let (level, dir) = logging_status().expect("active");
        assert_eq!(level, "info");
        assert_eq!(dir, first.path());
    }
}
