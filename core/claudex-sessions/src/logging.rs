//! Tracing setup for the claudex-sessions binary.
//!
//! Events go to stderr and, when possible, to a per-run file in
//! `.claudex/logs/`. `CLAUDEX_DEBUG_LOG=1` forces debug level; otherwise
//! `RUST_LOG` applies, defaulting to `info`.

use chrono::Local;
use claudex_core::logs::log_file_name;
use claudex_core::StorageConfig;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Keeps the file writer flushing until dropped.
pub struct LoggingGuard {
    _worker: Option<WorkerGuard>,
    log_file: Option<PathBuf>,
}

impl LoggingGuard {
    /// The file this run logs to, if file logging is active.
    pub fn log_file(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }
}

pub fn init(storage: &StorageConfig) -> LoggingGuard {
    let filter = env_filter();
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, worker, log_file) = match file_logging_dir(storage) {
        Some(dir) => {
            let name = log_file_name(&Local::now());
            let appender = tracing_appender::rolling::never(&dir, &name);
            let (writer, worker) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(worker), Some(dir.join(name)))
        }
        None => (None, None, None),
    };

    // A subscriber may already be installed (tests); keep going without ours.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    LoggingGuard {
        _worker: worker,
        log_file,
    }
}

fn env_filter() -> EnvFilter {
    let debug_enabled = std::env::var("CLAUDEX_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Logs directory to write into, or `None` for stderr-only logging.
///
/// While a legacy `logs/` directory still awaits migration the canonical one
/// must not be created, or the migrator would leave the legacy tree behind.
fn file_logging_dir(storage: &StorageConfig) -> Option<PathBuf> {
    let dir = storage.logs_dir();
    if !dir.is_dir() && storage.legacy_logs_dir().is_dir() {
        return None;
    }
    fs_err::create_dir_all(&dir).ok()?;
    Some(dir)
}
