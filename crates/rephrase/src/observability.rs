//! Logging setup for the CLI.
//!
//! Human-readable events go to stderr. When a log path or directory is
//! configured, every event is also appended as one JSON object per line to a
//! file through a non-blocking writer.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_PATH_ENV: &str = "REPHRASE_LOG_PATH";
const LOG_DIR_ENV: &str = "REPHRASE_LOG_DIR";
const DEFAULT_LOG_FILE: &str = "rephrase.jsonl";

/// Where JSONL logs go, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Explicit log file, from `REPHRASE_LOG_PATH`.
    pub log_path: Option<PathBuf>,
    /// Log directory; the file inside it is `rephrase.jsonl`.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Read the environment, falling back to the configured log directory.
    ///
    /// `REPHRASE_LOG_DIR` wins over `config_log_dir`.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        let non_empty = |key: &str| {
            std::env::var_os(key)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            log_path: non_empty(LOG_PATH_ENV),
            log_dir: non_empty(LOG_DIR_ENV).or(config_log_dir),
        }
    }

    /// Directory and file name of the JSONL log.
    fn log_file(&self) -> Option<(PathBuf, String)> {
        if let Some(path) = &self.log_path {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            let name = path
                .file_name()
                .map_or_else(|| DEFAULT_LOG_FILE.to_string(), |n| n.to_string_lossy().into_owned());
            return Some((dir, name));
        }
        self.log_dir
            .as_ref()
            .map(|dir| (dir.clone(), DEFAULT_LOG_FILE.to_string()))
    }
}

/// Filter from `RUST_LOG`, or from the CLI flags and configured level.
///
/// `--quiet` wins over `--verbose`; one `-v` means debug, two or more trace.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => default_level,
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    EnvFilter::new(level)
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes the file writer.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let (file_layer, guard) = match config.log_file() {
        Some((dir, name)) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(&dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(guard)
}
