//! Per-invocation log files and their adoption by a session.
//!
//! Each run starts logging to `claudex-YYYYMMDD-HHMMSS.log`. Once the run is
//! bound to a persisted session, the file is renamed to `<session-name>.log`
//! so a session's history stays in one place across resumes.

use crate::env::{Environment, LOG_FILE_VAR};
use crate::metadata::is_ephemeral;
use chrono::{DateTime, TimeZone};
use fs_err as fs;
use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Name of the log file for a run started at `at`.
pub fn log_file_name<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("claudex-{}.log", at.format("%Y%m%d-%H%M%S"))
}

/// Path of the long-lived log for a named session.
pub fn session_log_path(logs_dir: &Path, session_name: &str) -> PathBuf {
    logs_dir.join(format!("{}.log", session_name))
}

/// Moves the current run's log to the session's log file.
///
/// If the session already has a log (a resumed session), the current log is
/// appended to it and removed. On success `CLAUDEX_LOG_FILE` points at the
/// session log and its path is returned.
///
/// Ephemeral sessions, a missing current log path and any I/O failure all
/// leave the current log and the environment as they were and return `None`.
pub fn adopt_session_log(
    current_log: &Path,
    session_name: &str,
    session_path: &Path,
    env: &dyn Environment,
) -> Option<PathBuf> {
    if is_ephemeral(session_path) || current_log.as_os_str().is_empty() || session_name.is_empty() {
        return None;
    }

    let logs_dir = current_log.parent().unwrap_or_else(|| Path::new("."));
    let target = session_log_path(logs_dir, session_name);
    if target == current_log {
        return Some(target);
    }

    let result = if target.exists() {
        append_and_remove(current_log, &target)
    } else {
        fs::rename(current_log, &target)
    };

    match result {
        Ok(()) => {
            env.set_var(LOG_FILE_VAR, &target.to_string_lossy());
            tracing::debug!(log = %target.display(), "Adopted session log");
            Some(target)
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                log = %current_log.display(),
                session = %session_name,
                "Could not move log to session log, keeping current file"
            );
            None
        }
    }
}

fn append_and_remove(current_log: &Path, target: &Path) -> std::io::Result<()> {
    let content = fs::read(current_log)?;
    let mut file = fs::OpenOptions::new().append(true).open(target)?;
    file.write_all(&content)?;
    file.flush()?;
    fs::remove_file(current_log)
}
